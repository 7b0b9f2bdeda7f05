pub(crate) mod activity;
pub(crate) mod extract;
pub(crate) mod periods;
