pub mod token_manager;
