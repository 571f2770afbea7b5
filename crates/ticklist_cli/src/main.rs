//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ticklist_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use ticklist_core::{ListStore, MemoryByteStore};

fn main() {
    println!("ticklist_core version={}", ticklist_core::core_version());

    let mut list = ListStore::new(MemoryByteStore::new());
    match list.add("smoke check item") {
        Ok(record) => println!("added text={} completed={}", record.text(), record.completed()),
        Err(err) => println!("add failed: {err}"),
    }
    match list.toggle(0) {
        Ok(completed) => println!("toggled completed={completed}"),
        Err(err) => println!("toggle failed: {err}"),
    }
    println!("visible={} total={}", list.visible().count(), list.len());
}
