// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

// Build scripts run on the host, so the target comes from cargo's environment rather than
// from `cfg(target_arch)`.
fn main() {
    println!("cargo::rustc-check-cfg=cfg(aarch64)");
    println!("cargo::rustc-check-cfg=cfg(arm)");
    println!("cargo::rustc-check-cfg=cfg(x86_64)");
    println!("cargo::rerun-if-env-changed=CARGO_CFG_TARGET_ARCH");

    match std::env::var("CARGO_CFG_TARGET_ARCH").as_deref() {
        Ok("aarch64") => println!("cargo::rustc-cfg=aarch64"),
        Ok("arm") => println!("cargo::rustc-cfg=arm"),
        Ok("x86_64") => println!("cargo::rustc-cfg=x86_64"),
        Ok(other) => {
            panic!("Unsupported architecture {other}. We only support aarch64, arm and x86_64.")
        }
        Err(e) => panic!("CARGO_CFG_TARGET_ARCH not set: {e}"),
    }
}
