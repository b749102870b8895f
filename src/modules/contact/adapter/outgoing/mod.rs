pub mod web3forms_delivery;

pub use web3forms_delivery::Web3FormsDelivery;
