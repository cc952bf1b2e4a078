use assert_cmd::Command;

pub fn dustpan_cmd() -> Command {
    let mut cmd = Command::cargo_bin("dustpan").unwrap();
    cmd.env_remove("DUSTPAN_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}
