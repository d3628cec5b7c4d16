use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

/// Create an empty scratch directory for one test. Directories are keyed by
/// test name so concurrently running tests cannot trip over each other.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("jackc-tests").join(name);

    // leftovers from a previous run would leak into the assertions
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("could not create scratch directory");

    dir
}

/// Write a source file into `dir` and return its path.
pub fn write_source(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).expect("could not write source file");
    path
}

/// Run the compiler binary on `path` and return its output.
pub fn run_compiler(binary: &str, path: &Path) -> Output {
    Command::new(binary)
        .arg(path)
        .output()
        .expect("could not run compiler")
}

/// Run the compiler binary with extra arguments before the path.
pub fn run_compiler_with_args(binary: &str, args: &[&str], path: &Path) -> Output {
    Command::new(binary)
        .args(args)
        .arg(path)
        .output()
        .expect("could not run compiler")
}

/// Read the `.vm` listing written next to `source_path`.
pub fn read_vm_listing(source_path: &Path) -> String {
    let path = source_path.with_extension("vm");
    fs::read_to_string(&path)
        .unwrap_or_else(|error| panic!("could not read '{}': {error}", path.display()))
}
