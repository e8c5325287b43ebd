pub(crate) mod blit;
pub(crate) mod clip;
