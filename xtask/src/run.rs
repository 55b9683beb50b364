use duct::cmd;

pub fn run_efibootdude(release: bool, args: &[String]) -> anyhow::Result<()> {
    let mut run_args = vec!["run", "--bin", "efibootdude"];

    if release {
        run_args.extend(["--profile", "release-lto"]);
    }

    run_args.push("--");
    run_args.extend(args.iter().map(String::as_str));

    if let Err(e) = cmd("cargo", run_args).run() {
        println!("hint: efibootmgr needs an EFI system, pass a saved listing file to try it elsewhere");
        return Err(e.into());
    }
    Ok(())
}
