pub mod tx_manager;
