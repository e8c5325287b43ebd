pub(crate) mod fast;
