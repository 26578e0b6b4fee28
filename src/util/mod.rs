pub(crate) mod array_str;
pub(crate) mod b;
pub(crate) mod cache;
