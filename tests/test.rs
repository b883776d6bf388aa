
use std::path::Path;

use example_patch::ExamplePatch;

fn get_all_examples() -> Vec<ExamplePatch> { ExamplePatch::load_all(Path::new("tests/examples")) }

#[test]
fn test_examples_are_loaded() {
    let examples = get_all_examples();

    assert!(!examples.is_empty());
    assert!(examples.iter().all(|example| !example.name().is_empty()));
}

#[test]
fn test_cursor_rides_along_with_patches() {
    for example in &get_all_examples() {
        example.assert_matches();
    }
}
