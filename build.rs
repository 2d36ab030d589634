///
/// This build script probes the standard library for runtime feature
/// detection macros that gate the arch-specific lane kernels.
///

fn main() {
    println!("cargo:rustc-check-cfg=cfg(has_aarch64_simd)");

    let ac = autocfg::new();
    // NEON lanes need `is_aarch64_feature_detected`, which only exists on
    // aarch64 with a recent enough std.
    ac.emit_path_cfg("std::arch::is_aarch64_feature_detected", "has_aarch64_simd");

    autocfg::rerun_path("build.rs");
}
