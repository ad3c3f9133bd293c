fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(feature = "cpp-fixture")]
    build_cpp_fixture();
}

/// Compile the C++ hierarchy used by `tests/cpp_fixture.rs`
#[cfg(feature = "cpp-fixture")]
fn build_cpp_fixture() {
    let mut build = cc::Build::new();

    build
        .cpp(true)
        .flag_if_supported("-std=c++17")
        .flag_if_supported("/std:c++17")
        .flag_if_supported("-O2")
        .file("fixtures/refcnt_fixture.cpp");

    // Platform-specific C++ stdlib
    if cfg!(target_os = "macos") {
        build.flag("-stdlib=libc++");
    }

    build.compile("skref_fixture");

    println!("cargo:rerun-if-changed=fixtures/refcnt_fixture.cpp");
}
