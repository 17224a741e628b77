use notes::index::{render_index, splice_root_index, NOTES_TREE_MARKER};
use notes::tree::{ContentNode, DirectoryNode, FileNode};
use proptest::prelude::*;

fn file(parent: &[String], index: usize, title: String) -> ContentNode {
    let name = format!("note-{}.md", index);
    let mut relative_path = parent.to_vec();
    relative_path.push(name.clone());
    ContentNode::File(FileNode {
        name,
        relative_path,
        title,
        tree_title: None,
    })
}

const TITLE: &str = "[A-Za-z][A-Za-z ]{0,10}";

prop_compose! {
    fn arb_tree()(
        dirs in prop::collection::vec((TITLE, prop::collection::vec(TITLE, 0..4)), 0..4),
        files in prop::collection::vec(TITLE, 0..4),
    ) -> ContentNode {
        let mut children = Vec::new();

        for (i, (title, file_titles)) in dirs.into_iter().enumerate() {
            let name = format!("dir-{}", i);
            let path = vec![name.clone()];
            let dir_children = file_titles
                .into_iter()
                .enumerate()
                .map(|(j, t)| file(&path, j, t))
                .collect();
            children.push(ContentNode::Directory(DirectoryNode {
                name,
                relative_path: path,
                title,
                children: dir_children,
            }));
        }
        for (i, title) in files.into_iter().enumerate() {
            children.push(file(&[], i, title));
        }

        ContentNode::Directory(DirectoryNode {
            name: "notes".to_string(),
            relative_path: Vec::new(),
            title: "Notes".to_string(),
            children,
        })
    }
}

fn count_nodes(node: &ContentNode) -> usize {
    node.children().iter().map(|c| 1 + count_nodes(c)).sum()
}

proptest! {
    #[test]
    fn splice_is_idempotent(tree in arb_tree(), prefix in "[a-zA-Z# \n]{0,40}") {
        let current = format!("{}{}\nold content", prefix, NOTES_TREE_MARKER);
        let once = splice_root_index(&current, &tree, "README.md").unwrap();
        let twice = splice_root_index(&once, &tree, "README.md").unwrap();

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.starts_with(&prefix));
    }

    #[test]
    fn one_line_per_node(tree in arb_tree()) {
        let rendered = render_index(&tree);
        let lines = if rendered.is_empty() { 0 } else { rendered.lines().count() };
        prop_assert_eq!(lines, count_nodes(&tree));
        prop_assert!(rendered.lines().all(|l| l.trim_start().starts_with("- [")));
    }
}
