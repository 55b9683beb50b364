use duct::cmd;

pub fn build_all_crates(release: bool) -> anyhow::Result<()> {
    let mut build_args = vec!["build", "--workspace", "--exclude", "efibootdude-fuzz"];

    if release {
        build_args.extend(["--profile", "release-lto"]);
    }

    cmd("cargo", build_args).run()?;
    Ok(())
}
