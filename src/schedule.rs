pub(crate) mod looper;
pub(crate) mod scheduler;
pub(crate) mod timer;
