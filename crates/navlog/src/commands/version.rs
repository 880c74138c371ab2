pub fn run() -> anyhow::Result<()> {
    println!("navlog {}", env!("CARGO_PKG_VERSION"));
    println!("Event-log statistics for the accessible navigation prototype");
    Ok(())
}
