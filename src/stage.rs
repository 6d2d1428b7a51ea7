pub(crate) mod effect;
pub(crate) mod presets;
pub(crate) mod table;
