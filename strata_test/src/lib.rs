use std::{
    fs,
    path::{Path, PathBuf},
    sync::Once,
};

use image::{Rgba, RgbaImage};
use strata_shared::log::LevelFilter;

pub use spectral;

/// Folder in which tests can leave files for debugging.
pub const TEST_RESULT_FOLDER: &str = "test_results";

/// Installs a logger for the tests. Can be called by every test; only the first call has an effect.
pub fn setup_logger() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Err(err) = simple_logger::SimpleLogger::new().with_level(LevelFilter::Trace).init() {
            println!("Failed to install the logger for the tests: {err}");
        }
    });
}

/// Creates a folder in [`TEST_RESULT_FOLDER`] that is named after the given function.
pub fn create_test_result_folder_for_function(function_name: &str) -> PathBuf {
    let test_name = function_name.replace("::", ".");
    let path = Path::new(TEST_RESULT_FOLDER).join(test_name);
    fs::create_dir_all(&path).unwrap_or_else(|err| panic!("Failed to create the test result folder {}: {err}", path.display()));
    path
}

/// Writes a square PNG with a chessboard pattern of the given size. Used as a stand-in for image files
/// that are imported into a project.
pub fn write_png(path: impl AsRef<Path>, size: u32) {
    let image = RgbaImage::from_fn(size, size, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    image
        .save(&path)
        .unwrap_or_else(|err| panic!("Failed to save image to path \"{}\": {err}", path.as_ref().display()));
}
