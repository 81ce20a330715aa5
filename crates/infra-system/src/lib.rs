// ToolOne Infrastructure - System Adapters
// Implements: ProcessKiller

pub mod process_killer_impl;

pub use process_killer_impl::SysinfoProcessKiller;
