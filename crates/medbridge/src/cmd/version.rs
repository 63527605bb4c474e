use medbridge::message::EventType;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("medbridge {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: medbridge");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("MEDBRIDGE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "profile: {}",
        option_env!("MEDBRIDGE_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("MEDBRIDGE_GIT_HASH").unwrap_or("unknown"));
    println!("bridge_events: {}", EventType::ALL.len());
    println!(
        "features: host={}, content={}, loopback={}, cli=true",
        cfg!(feature = "host"),
        cfg!(feature = "content"),
        cfg!(feature = "loopback")
    );

    Ok(SUCCESS)
}
