//! Tests for building category trees from directories on disk

use std::path::Path;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use catscan::util::testing;
use catscan::{CategoryNode, KindRegistry, ServiceContainer, Settings};

fn touch(dir: &Path, rel: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&path, b"").expect("write file");
}

fn mkdir(dir: &Path, rel: &str) {
    std::fs::create_dir_all(dir.join(rel)).expect("create dir");
}

fn difficulty_registry() -> Arc<KindRegistry> {
    let mut builder = KindRegistry::builder();
    builder
        .register_kind("Easy", None)
        .unwrap()
        .register_kind("Medium", Some("Easy"))
        .unwrap()
        .register_kind("Hard", Some("Medium"))
        .unwrap()
        .register_kind("Animals", None)
        .unwrap()
        .register_kind("Dogs", Some("Animals"))
        .unwrap();
    Arc::new(builder.build().unwrap())
}

fn container(root: &Path, settings: Settings) -> ServiceContainer {
    testing::init_test_setup();
    let settings = Settings {
        root_dir: root.to_path_buf(),
        ..settings
    };
    ServiceContainer::new(settings, difficulty_registry())
}

// Easy/
// ├── cat1.jpg, cat2.png, notes.txt
// └── Medium/
//     ├── dog1.jpg
//     └── junk/
#[fixture]
fn scenario() -> TempDir {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "Easy/cat1.jpg");
    touch(temp.path(), "Easy/cat2.png");
    touch(temp.path(), "Easy/notes.txt");
    touch(temp.path(), "Easy/Medium/dog1.jpg");
    mkdir(temp.path(), "Easy/Medium/junk");
    temp
}

fn image_names(node: &CategoryNode) -> Vec<String> {
    node.images()
        .iter()
        .filter_map(|i| i.file_name().map(str::to_string))
        .collect()
}

#[rstest]
fn given_registered_subdirectory_when_building_then_creates_child(scenario: TempDir) {
    // Act
    let tree = container(scenario.path(), Settings::default())
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    // Assert
    let easy = tree.root();
    assert_eq!(easy.name(), "Easy");
    assert_eq!(image_names(easy), vec!["cat1.jpg", "cat2.png"]);
    assert_eq!(easy.sub_categories().len(), 1);

    let medium = &easy.sub_categories()[0];
    assert_eq!(medium.name(), "Medium");
    assert_eq!(image_names(medium), vec!["dog1.jpg"]);
    assert!(medium.sub_categories().is_empty());

    assert_eq!(tree.height(), 1);
    assert!(easy.find("junk").is_none());
    assert!(tree.is_complete());
}

#[rstest]
fn given_images_when_building_then_refs_point_into_category_dir(scenario: TempDir) {
    let tree = container(scenario.path(), Settings::default())
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    let medium = &tree.root().sub_categories()[0];
    assert_eq!(medium.path(), scenario.path().join("Easy/Medium"));
    assert_eq!(
        medium.images()[0].relative_to(scenario.path()),
        Some(Path::new("Easy/Medium/dog1.jpg").to_path_buf())
    );
}

#[test]
fn given_empty_root_when_building_then_empty_leaf() {
    let temp = TempDir::new().unwrap();
    mkdir(temp.path(), "Easy");

    let tree = container(temp.path(), Settings::default())
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    assert!(tree.root().images().is_empty());
    assert!(tree.root().sub_categories().is_empty());
    assert_eq!(tree.height(), 0);
    assert!(tree.is_complete());
}

#[test]
fn given_kind_from_other_branch_when_building_then_skips_it() {
    // Arrange: Dogs is registered but specializes Animals, not Easy
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "Easy/a.png");
    touch(temp.path(), "Easy/Dogs/d.png");
    touch(temp.path(), "Easy/Medium/m.png");

    // Act
    let tree = container(temp.path(), Settings::default())
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    // Assert
    let names: Vec<_> = tree.root().sub_categories().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Medium"]);
    assert!(tree.is_complete());
}

#[test]
fn given_parent_kind_below_child_when_building_then_skips_it() {
    // Easy may not appear under Medium: Easy does not specialize Medium
    let temp = TempDir::new().unwrap();
    mkdir(temp.path(), "Easy/Medium/Easy");

    let tree = container(temp.path(), Settings::default())
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    assert_eq!(tree.height(), 1);
    assert!(tree.root().sub_categories()[0].sub_categories().is_empty());
}

#[test]
fn given_nested_specializations_when_building_then_height_counts_edges() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "Easy/Medium/Hard/h.jpeg");
    mkdir(temp.path(), "Easy/Hard");

    let tree = container(temp.path(), Settings::default())
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    let root = tree.root();
    // Hard specializes Easy through Medium, so it is accepted directly under Easy too
    let names: Vec<_> = root.sub_categories().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Hard", "Medium"]);
    assert_eq!(tree.height(), 2);
    assert_eq!(root.find("Medium").map(|m| m.height()), Some(1));
    assert_eq!(root.find("Hard").map(|h| h.height()), Some(0));
}

#[rstest]
#[case("photo.JPG", true)]
#[case("photo.jpeg", true)]
#[case("photo.png", true)]
#[case("photo.gif", false)]
#[case("photo.png.txt", false)]
#[case("README", false)]
#[case("Easy.class", false)]
fn given_file_when_building_then_only_image_extensions_count(
    #[case] file: &str,
    #[case] is_image: bool,
) {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), &format!("Easy/{file}"));

    let tree = container(temp.path(), Settings::default())
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    assert_eq!(tree.root().images().len(), usize::from(is_image));
    assert!(tree.root().sub_categories().is_empty());
}

#[test]
fn given_custom_extensions_when_building_then_uses_them() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "Easy/a.webp");
    touch(temp.path(), "Easy/b.png");

    let settings = Settings {
        image_extensions: vec!["webp".into()],
        ..Settings::default()
    };
    let tree = container(temp.path(), settings)
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    assert_eq!(image_names(tree.root()), vec!["a.webp"]);
}

#[rstest]
fn given_same_directory_when_rebuilding_then_structurally_identical(scenario: TempDir) {
    let container = container(scenario.path(), Settings::default());
    let first = container.catalog.build_category_tree("Easy").unwrap();
    let second = container.catalog.build_category_tree("Easy").unwrap();

    let shape = |n: &CategoryNode| {
        n.iter()
            .map(|c| (c.name().to_string(), image_names(c)))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(first.root()), shape(second.root()));
    assert_eq!(first.root(), second.root());
}

#[test]
fn given_parallel_build_when_building_then_order_matches_sequential() {
    // Arrange: many sibling specializations
    let mut builder = KindRegistry::builder();
    builder.register_kind("Easy", None).unwrap();
    for i in 0..16 {
        builder
            .register_kind(&format!("Level{i:02}"), Some("Easy"))
            .unwrap();
    }
    let registry = Arc::new(builder.build().unwrap());

    let temp = TempDir::new().unwrap();
    for i in 0..16 {
        touch(temp.path(), &format!("Easy/Level{i:02}/img{i}.png"));
        touch(temp.path(), &format!("Easy/Level{i:02}/more{i}.jpg"));
    }

    let build = |parallel: bool| {
        let settings = Settings {
            root_dir: temp.path().to_path_buf(),
            parallel,
            ..Settings::default()
        };
        ServiceContainer::new(settings, Arc::clone(&registry))
            .catalog
            .build_category_tree("Easy")
            .unwrap()
    };

    // Act
    let sequential = build(false);
    let parallel = build(true);

    // Assert
    let order = |t: &catscan::CategoryTree| {
        t.root()
            .iter()
            .map(|n| (n.name().to_string(), image_names(n)))
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&sequential), order(&parallel));
    assert_eq!(parallel.root().sub_categories().len(), 16);
}

#[test]
fn given_unregistered_root_when_building_then_errors() {
    let temp = TempDir::new().unwrap();
    mkdir(temp.path(), "junk");

    let result = container(temp.path(), Settings::default())
        .catalog
        .build_category_tree("junk");

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unknown category kind"));
}

#[test]
fn given_missing_root_directory_when_building_then_scan_error() {
    let temp = TempDir::new().unwrap();

    let result = container(temp.path(), Settings::default())
        .catalog
        .build_category_tree("Easy");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("cannot scan directory"));
}

#[cfg(unix)]
#[test]
fn given_unreadable_subdirectory_when_building_then_siblings_survive() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    touch(temp.path(), "Easy/Medium/m.png");
    touch(temp.path(), "Easy/Hard/h.png");
    let locked = temp.path().join("Easy/Hard");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // root ignores permission bits; nothing to assert in that case
    let readable = std::fs::read_dir(&locked).is_ok();

    let tree = container(temp.path(), Settings::default())
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    if readable {
        assert!(tree.is_complete());
        return;
    }
    let names: Vec<_> = tree.root().sub_categories().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Medium"]);
    assert_eq!(tree.scan_errors().len(), 1);
    assert_eq!(tree.scan_errors()[0].scan_path(), Some(&locked));
}

#[cfg(unix)]
#[test]
fn given_dangling_link_when_following_links_then_category_still_builds() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "Easy/a.png");
    touch(temp.path(), "shared/Medium/m.jpg");
    std::os::unix::fs::symlink(temp.path().join("missing.png"), temp.path().join("Easy/b.png"))
        .unwrap();
    std::os::unix::fs::symlink(temp.path().join("shared/Medium"), temp.path().join("Easy/Medium"))
        .unwrap();

    let settings = Settings {
        follow_links: true,
        ..Settings::default()
    };
    let tree = container(temp.path(), settings)
        .catalog
        .build_category_tree("Easy")
        .unwrap();

    assert!(tree.is_complete());
    assert_eq!(image_names(tree.root()), vec!["a.png"]);
    let names: Vec<_> = tree.root().sub_categories().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Medium"]);
    assert_eq!(tree.root().total_images(), 2);
}
