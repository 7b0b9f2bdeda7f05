pub(crate) mod bundle;
pub(crate) mod ffmpeg;
pub(crate) mod gif;
