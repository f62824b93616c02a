pub mod document;
pub mod model;
pub mod slug;
pub mod util;
