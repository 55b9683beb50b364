use duct::cmd;

pub fn test_crate() -> anyhow::Result<()> {
    cmd!("cargo", "clippy", "--workspace", "--exclude", "efibootdude-fuzz").run()?;
    cmd!("cargo", "test").run()?;
    Ok(())
}
