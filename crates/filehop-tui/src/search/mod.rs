//! Search sessions as seen through the picker.
//!
//! [`SearchView`] wraps a [`filehop_search::SearchSession`], mirrors its
//! results into picker items and shows the query scrollback while the input
//! is empty.

mod view;

pub use view::SearchView;
