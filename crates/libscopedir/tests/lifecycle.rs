// Integration tests are compiled as a separate crate, so these lints don't apply
#![allow(clippy::tests_outside_test_module)]
#![allow(missing_docs)]

use std::fs;

use libscopedir::{JdbcUrl, ScopeDirError, ScopedDir, exit, require};

/// The full lifecycle a typical caller runs through: create, populate, reuse
/// after clearing contents, then remove.
#[test]
fn create_populate_clear_and_remove() {
    let scoped = ScopedDir::create("lifecycle-").unwrap();
    assert!(scoped.path().is_dir());

    let nested = scoped.path().join("work").join("batch-1");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("payload.bin"), vec![0u8; 1024]).unwrap();
    fs::write(scoped.path().join("manifest.toml"), "version = 1\n").unwrap();

    // Clearing keeps the root usable for the next batch.
    assert!(scoped.remove_contents().is_empty());
    assert!(scoped.path().is_dir());
    fs::write(scoped.path().join("manifest.toml"), "version = 2\n").unwrap();

    scoped.remove_strict().unwrap();
    assert!(!scoped.path().exists());

    // Repeated removal of a gone directory stays silent under both policies.
    assert!(scoped.remove().is_empty());
    scoped.remove_strict().unwrap();
}

/// Exit-time cleanup through the global registry, the way a host `main`
/// drives it.
#[test]
fn global_registry_cleans_up_registered_directories() {
    let scoped = ScopedDir::create_with_exit_cleanup("lifecycle-exit-").unwrap();
    fs::write(scoped.path().join("left-behind.txt"), b"x").unwrap();
    assert!(scoped.path().exists());

    exit::registry().run_hooks();
    assert!(!scoped.path().exists());

    // The global registry has fired for this process; late registrations are
    // refused and leave new directories alone.
    let late = ScopedDir::create_with_exit_cleanup("lifecycle-late-").unwrap();
    exit::registry().run_hooks();
    assert!(late.path().exists());
    late.remove_strict().unwrap();
}

#[test]
fn leaf_utilities_compose_with_the_error_type() {
    let parsed = "jdbc:postgresql://localhost:5432/mydb".parse::<JdbcUrl>();
    let url = require(parsed.ok(), "connection string required").unwrap();
    assert_eq!(url.database(), "mydb");

    let err = "postgresql://localhost/mydb".parse::<JdbcUrl>().unwrap_err();
    assert!(matches!(err, ScopeDirError::Format { .. }));
}
