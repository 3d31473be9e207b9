pub mod composer;
pub mod dict;
pub mod normalize;
pub mod settings;
pub mod suggest;
