pub(crate) mod pixel;
pub(crate) mod sprite;
pub(crate) mod view;
