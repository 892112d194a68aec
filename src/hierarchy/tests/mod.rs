//! Tests for the hierarchy browser model.
//!
//! Every test builds from the same small snapshot: one project with two
//! datasets, one category group with two categories, and an orphan image.
//! Image 11 sits in both categories.


use super::HierarchyData;

pub(super) const FIXTURE: &str = r#"{
    "projects": [
        {
            "id": 1,
            "name": "Mitosis",
            "datasets": [
                {
                    "id": 10,
                    "name": "Day 1",
                    "images": [
                        { "id": 11, "name": "cell_a.tif" },
                        { "id": 12, "name": "cell_b.tif" }
                    ]
                },
                {
                    "id": 20,
                    "name": "Day 2",
                    "images": [{ "id": 21, "name": "cell_c.tif" }]
                }
            ]
        }
    ],
    "category_groups": [
        {
            "id": 100,
            "name": "Phase",
            "categories": [
                {
                    "id": 101,
                    "name": "Prophase",
                    "images": [
                        { "id": 11, "name": "cell_a.tif" },
                        { "id": 21, "name": "cell_c.tif" }
                    ]
                },
                {
                    "id": 102,
                    "name": "Anaphase",
                    "images": [{ "id": 11, "name": "cell_a.tif" }]
                }
            ]
        }
    ],
    "orphan_images": [{ "id": 99, "name": "stray.png" }]
}"#;

pub(super) fn fixture() -> HierarchyData {
    HierarchyData::from_json(FIXTURE).unwrap()
}
