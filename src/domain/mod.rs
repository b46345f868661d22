//! Domain layer - the pure core of the experiment protocol.
//!
//! Nothing in this module performs I/O. The registry and decode tables are
//! read-only data fixed at process start; the decoder and sampler are pure
//! functions over them.

mod decoder;
mod design;
mod errors;
mod registry;
mod sampler;

pub use decoder::{decode, Presentation};
pub use design::{ChosenDesign, DesignVector};
pub use errors::DecodeError;
pub use registry::{
    Characteristic, CharacteristicRegistry, DecodeEntry, ImagePair, LevelValue, RegistryVersion,
};
pub use sampler::{check_answer, gen_payment_params, sample_characteristics, transform_earnings};
