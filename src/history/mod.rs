//! История раздач: кодек, сохраняемая запись и сборщик из событий движка.

pub mod codec;
pub mod record;
pub mod recorder;

pub use codec::{
    card_to_index, card_to_string, decode_action, encode_action, index_to_card, string_to_card, ActionTag,
    CodecError, EncodedAction,
};
pub use record::{HandHistory, Stakes, VARIANT_NLHE};
pub use recorder::HistoryRecorder;
