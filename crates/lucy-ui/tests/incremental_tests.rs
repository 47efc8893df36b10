//! Incremental layout tests: dirty tracking must give the same rects as a
//! full pass while touching only the affected subtrees.

use lucy_core::geometry::Rect;
use lucy_ui::builder::{ConstraintBuilder, UiBuilder};
use lucy_ui::constraint::{SizeBehavior, SizeConstraint};
use lucy_ui::layout::LayoutEngine;
use lucy_ui::tree::{LayoutRect, NodeId, UiTree};
use lucy_ui::widgets::{Button, Container, Frame};

const SCREEN: LayoutRect = Rect::new(0.0, 0.0, 1024.0, 768.0);

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("lucy_ui=debug")
        .try_init();
}

struct Fixture {
    tree: UiTree,
    root: NodeId,
    /// Rows in order, each a non-fitting container
    rows: Vec<NodeId>,
    /// Leaves per row
    cells: Vec<Vec<NodeId>>,
    /// Fixed container sized to its content
    badge: NodeId,
}

fn build(rows: usize, columns: usize) -> Fixture {
    let mut tree = UiTree::new();
    let mut row_ids = Vec::new();
    let mut cells = Vec::new();
    let mut badge = None;

    let mut ui = UiBuilder::new(&mut tree);
    ui.vstack()
        .spacing(4.0)
        .padding(8.0)
        .children(|ui| {
            for r in 0..rows {
                let mut row_cells = Vec::new();
                let row = ui
                    .hstack()
                    .behavior(SizeBehavior::Flexible)
                    .size(200.0, 30.0)
                    .spacing(2.0)
                    .children(|ui| {
                        for c in 0..columns {
                            let cell = if (r + c) % 3 == 0 {
                                ui.stretcher().build()?
                            } else {
                                ui.frame().size(20.0 + c as f32, 20.0).build()?
                            };
                            row_cells.push(cell);
                        }
                        Ok(())
                    })
                    .build()?;
                row_ids.push(row);
                cells.push(row_cells);
            }
            badge = Some(
                ui.hstack()
                    .fit_content(true)
                    .behavior(SizeBehavior::Fixed)
                    .size(0.0, 0.0)
                    .padding(3.0)
                    .children(|ui| {
                        ui.button("new").build()?;
                        ui.frame().size(12.0, 12.0).build()?;
                        Ok(())
                    })
                    .build()?,
            );
            Ok(())
        })
        .build()
        .unwrap();
    let root = ui.finish().unwrap();

    Fixture {
        tree,
        root,
        rows: row_ids,
        cells,
        badge: badge.unwrap(),
    }
}

fn all_rects(tree: &UiTree, root: NodeId) -> Vec<(NodeId, LayoutRect)> {
    tree.visible_descendants(root)
        .unwrap()
        .into_iter()
        .map(|id| (id, tree.layout(id).unwrap()))
        .collect()
}

/// Apply `mutate` to two identical trees, update one incrementally and the
/// other with a full pass, and compare every rect.
fn assert_incremental_matches_full(mutate: impl Fn(&mut Fixture)) {
    init_logging();
    let mut incremental = build(6, 5);
    let mut full = build(6, 5);
    let mut inc_engine = LayoutEngine::default();
    let mut full_engine = LayoutEngine::default();
    inc_engine
        .layout(&mut incremental.tree, incremental.root, SCREEN)
        .unwrap();
    full_engine.layout(&mut full.tree, full.root, SCREEN).unwrap();

    mutate(&mut incremental);
    mutate(&mut full);

    inc_engine.update(&mut incremental.tree);
    full_engine.relayout_all(&mut full.tree);

    assert_eq!(
        all_rects(&incremental.tree, incremental.root),
        all_rects(&full.tree, full.root)
    );
    assert!(!incremental.tree.is_dirty());
}

#[test]
fn test_leaf_constraint_change() {
    assert_incremental_matches_full(|f| {
        let cell = f.cells[2][1];
        f.tree
            .set_constraint(cell, SizeConstraint::fixed(55.0, 18.0))
            .unwrap();
    });
}

#[test]
fn test_row_constraint_change() {
    assert_incremental_matches_full(|f| {
        let row = f.rows[4];
        f.tree
            .update_constraint(row, |c| c.preferred.height = 90.0)
            .unwrap();
    });
}

#[test]
fn test_child_inserted_into_fitting_container() {
    assert_incremental_matches_full(|f| {
        let extra = f.tree.add(Button::new("more")).unwrap();
        f.tree.insert_child(f.badge, 0, extra).unwrap();
    });
}

#[test]
fn test_visibility_toggle() {
    assert_incremental_matches_full(|f| {
        f.tree.set_visible(f.rows[0], false).unwrap();
        f.tree.set_visible(f.cells[3][2], false).unwrap();
    });
}

#[test]
fn test_policy_change() {
    assert_incremental_matches_full(|f| {
        f.tree
            .update_policy(f.rows[1], |p| {
                p.spacing = 10.0;
                p.main_alignment = lucy_ui::policy::Alignment::End;
            })
            .unwrap();
        f.tree.update_policy(f.badge, |p| p.padding = 9.0).unwrap();
    });
}

#[test]
fn test_remove_and_reattach() {
    assert_incremental_matches_full(|f| {
        let row = f.rows[2];
        f.tree.detach(row).unwrap();
        f.tree.add_child(f.root, row).unwrap();
        f.tree.remove(f.rows[5]).unwrap();
    });
}

#[test]
fn test_viewport_resize() {
    assert_incremental_matches_full(|f| {
        f.tree
            .set_root(f.root, Rect::new(0.0, 0.0, 300.0, 200.0))
            .unwrap();
    });
}

#[test]
fn test_leaf_change_only_touches_its_row() {
    init_logging();
    let mut f = build(20, 8);
    let mut engine = LayoutEngine::default();
    let first = engine.layout(&mut f.tree, f.root, SCREEN).unwrap();
    assert_eq!(first.metrics.nodes_laid_out, f.tree.len());

    f.tree
        .set_constraint(f.cells[7][1], SizeConstraint::fixed(33.0, 10.0))
        .unwrap();
    let report = engine.update(&mut f.tree);

    // The row keeps its rect; only it and its cells are recomputed.
    assert_eq!(report.metrics.dirty_roots, 1);
    assert_eq!(report.metrics.nodes_laid_out, 1 + 8);
    assert_eq!(report.metrics.total_nodes, f.tree.len());
}

#[test]
fn test_fitting_container_change_reaches_root() {
    let mut f = build(3, 3);
    let mut engine = LayoutEngine::default();
    engine.layout(&mut f.tree, f.root, SCREEN).unwrap();

    let leaf = f.tree.children(f.badge).unwrap()[1];
    f.tree
        .set_constraint(leaf, SizeConstraint::fixed(12.0, 80.0))
        .unwrap();
    let report = engine.update(&mut f.tree);
    assert_eq!(report.metrics.nodes_laid_out, f.tree.len());
    assert_eq!(f.tree.layout(f.badge).unwrap().height, 86.0);
}

#[test]
fn test_detached_changes_wait_for_attachment() {
    let mut f = build(2, 2);
    let mut engine = LayoutEngine::default();
    engine.layout(&mut f.tree, f.root, SCREEN).unwrap();

    let loose = f
        .tree
        .add(Frame::new(SizeConstraint::fixed(70.0, 70.0)))
        .unwrap();
    let report = engine.update(&mut f.tree);
    assert_eq!(report.metrics.nodes_laid_out, 0);

    f.tree.add_child(f.rows[0], loose).unwrap();
    engine.update(&mut f.tree);
    assert_eq!(f.tree.layout(loose).unwrap().size().width, 70.0);
}

#[test]
fn test_rejected_widget_update_leaves_layout_alone() {
    assert_incremental_matches_full(|f| {
        let err = f.tree.update_widget::<Container, _>(f.rows[3], |row| {
            row.constraint.preferred.width = 120.0;
            row.policy.padding = -1.0;
        });
        assert!(err.is_err());
    });
}

#[test]
fn test_changes_under_hidden_row_wait_until_shown() {
    init_logging();
    let mut f = build(4, 3);
    let mut engine = LayoutEngine::default();
    engine.layout(&mut f.tree, f.root, SCREEN).unwrap();

    f.tree.set_visible(f.rows[1], false).unwrap();
    engine.update(&mut f.tree);

    f.tree
        .set_constraint(f.cells[1][1], SizeConstraint::fixed(44.0, 12.0))
        .unwrap();
    f.tree
        .update_policy(f.rows[1], |p| p.spacing = 7.0)
        .unwrap();
    let report = engine.update(&mut f.tree);
    assert_eq!(report.metrics.nodes_laid_out, 0);
    assert!(!f.tree.is_dirty());

    f.tree.set_visible(f.rows[1], true).unwrap();
    engine.update(&mut f.tree);
    let incremental = all_rects(&f.tree, f.root);

    let mut full = build(4, 3);
    full.tree
        .set_constraint(full.cells[1][1], SizeConstraint::fixed(44.0, 12.0))
        .unwrap();
    full.tree
        .update_policy(full.rows[1], |p| p.spacing = 7.0)
        .unwrap();
    LayoutEngine::default()
        .layout(&mut full.tree, full.root, SCREEN)
        .unwrap();
    assert_eq!(incremental, all_rects(&full.tree, full.root));
}
