pub mod types;
pub mod vrf;

pub use types::LotteryState;
pub use vrf::{
    expand_random_words, VrfConsumerMsg, VrfCoordinatorMsg, VrfCoordinatorQueryMsg,
    MAX_REQUEST_CONFIRMATIONS,
};
