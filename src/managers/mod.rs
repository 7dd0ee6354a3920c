// LearnHub state managers
// Managers own client state: the session, the collections, and the mutation flows.

pub mod bookmark_flow;
pub mod category_flow;
pub mod collection_store;
pub mod delete_flow;
pub mod flow_controller;
pub mod session_manager;
