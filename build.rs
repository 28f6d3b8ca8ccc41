use std::{env, path::PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let src = manifest_dir.join("src");
    let bindings = manifest_dir.join("bindings").join("c");

    // A C++ caller of the public header: includes it twice and takes the
    // descriptor through C linkage. Linked into the crate so tests can call it.
    cc::Build::new()
        .cpp(true)
        .include(&bindings)
        .file(bindings.join("header_check.cc"))
        .extra_warnings(false)
        .compile("tree-sitter-gn-header-check");

    let mut build = cc::Build::new();
    build.std("c11");
    build.include(&src);
    build.file(src.join("parser.c"));
    build.file(src.join("scanner.c"));
    build.flag_if_supported("-Wno-unused-parameter");
    build.flag_if_supported("-Wno-unused-function");
    build.flag_if_supported("-Wno-unused-variable");
    build.extra_warnings(false);
    build.compile("tree-sitter-gn");

    println!("cargo:rerun-if-changed={}", src.join("parser.c").display());
    println!("cargo:rerun-if-changed={}", src.join("scanner.c").display());
    println!("cargo:rerun-if-changed={}", src.join("tree_sitter").display());
    println!("cargo:rerun-if-changed={}", bindings.display());
}
