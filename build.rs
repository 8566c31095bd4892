// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common arguments: profile, module root, project, target OS
fn project_args() -> Vec<Arg> {
    vec![
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Deployment profile (default: qmlstage.toml in the project directory)"),
        Arg::new("qml_dir")
            .short('q')
            .long("qml-dir")
            .value_name("DIR")
            .help("Qt QML module root"),
        Arg::new("project")
            .short('p')
            .long("project")
            .value_name("DIR")
            .help("Project root containing the res directory"),
        Arg::new("os")
            .long("os")
            .value_name("OS")
            .help("Target OS (windows, darwin, linux, ...)"),
    ]
}

fn build_cli() -> Command {
    Command::new("qmlstage")
        .version(env!("CARGO_PKG_VERSION"))
        .author("qmlstage Contributors")
        .about("Stage the Qt QML modules a project depends on")
        .subcommand_required(true)
        .subcommand(
            Command::new("deploy")
                .about("Copy every QML module the project needs into the output directory")
                .args(project_args())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory (must already exist)"),
                )
                .arg(
                    Arg::new("parallel")
                        .long("parallel")
                        .action(ArgAction::SetTrue)
                        .help("Copy module trees in parallel"),
                ),
        )
        .subcommand(
            Command::new("deps")
                .about("List the QML module directories the project needs")
                .args(project_args())
                .arg(
                    Arg::new("absolute")
                        .long("absolute")
                        .action(ArgAction::SetTrue)
                        .help("Print absolute paths"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Also list directories covered by an ancestor"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("qmlstage.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
