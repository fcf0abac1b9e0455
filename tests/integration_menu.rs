mod common;

use common::{Page, Px, engine, engine_with, ms};
use float_portal::collaborators::{RowAction, RowActionKind, RowRef};
use float_portal::config::EngineConfig;
use float_portal::document::AnchorId;
use float_portal::engine::{EngineEvent, FloatingEngine};
use float_portal::geometry::Point;
use float_portal::menu::MenuState;
use float_portal::portal::PortalContent;
use float_portal::scheduler::ScrollSource;

fn click(
    engine: &mut FloatingEngine<Px>,
    page: &mut Page,
    point: Point,
    target: Option<AnchorId>,
) -> Option<RowAction> {
    engine.handle(&mut page.doc, EngineEvent::Click { point, target }, ms(0))
}

fn open(engine: &mut FloatingEngine<Px>, page: &mut Page, more: AnchorId) {
    let point = Point::new(230.0, 210.0);
    assert_eq!(click(engine, page, point, Some(more)), None);
}

fn labels(engine: &FloatingEngine<Px>) -> Vec<String> {
    match engine.menu().host().content() {
        Some(PortalContent::Menu { items }) => items.iter().map(|i| i.label.clone()).collect(),
        other => panic!("expected menu content, got {other:?}"),
    }
}

#[test]
fn menu_opens_past_the_sidebar_edge_aligned_with_its_row() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);

    assert!(engine.menu().is_open());
    assert_eq!(labels(&engine), vec!["Rename chat", "Delete chat"]);
    let host = engine.menu().host();
    let placed = host.placement().expect("placed");
    assert_eq!((placed.left, placed.top), (272.0, 200.0));
    // Narrower content is widened to the minimum menu width.
    assert_eq!(host.size().width, 160.0);
    assert_eq!(host.max_height(), None);
}

#[test]
fn outside_click_closes_without_an_action() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);

    let action = click(&mut engine, &mut page, Point::new(900.0, 600.0), None);
    assert_eq!(action, None);
    assert_eq!(engine.menu().state(), &MenuState::Closed);
    assert!(!engine.menu().host().is_visible());
}

#[test]
fn clicking_the_same_trigger_toggles_the_menu() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);
    open(&mut engine, &mut page, more);

    assert!(!engine.menu().is_open());
    assert_eq!(engine.menu().opened_count(), 1);
}

#[test]
fn clicking_another_trigger_moves_the_menu() {
    let mut page = Page::build();
    let mut engine = engine();
    let (first, second) = (page.long_more, page.short_more);
    open(&mut engine, &mut page, first);
    open(&mut engine, &mut page, second);

    assert_eq!(engine.menu().trigger(), Some(second));
    assert_eq!(engine.menu().opened_count(), 2);
    let MenuState::Open { row, .. } = engine.menu().state() else {
        panic!("menu should be open");
    };
    assert_eq!(row.key, "chat-short");
    assert_eq!(row.anchor, page.short_row);
    let placed = engine.menu().host().placement().expect("placed");
    assert_eq!(placed.top, 240.0);
}

#[test]
fn choosing_an_item_dispatches_and_closes() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);

    // Second item: inset 8, items 36 high, menu top at 200.
    let action = click(&mut engine, &mut page, Point::new(300.0, 249.0), None);
    assert_eq!(
        action,
        Some(RowAction {
            action: RowActionKind::Delete,
            row: RowRef {
                key: "chat-long".to_string(),
                anchor: page.long_row,
            },
        })
    );
    assert!(!engine.menu().is_open());
}

#[test]
fn clicking_the_menu_padding_keeps_it_open() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);

    let action = click(&mut engine, &mut page, Point::new(300.0, 203.0), None);
    assert_eq!(action, None);
    assert!(engine.menu().is_open());
}

#[test]
fn escape_closes_the_menu() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);

    engine.handle(&mut page.doc, EngineEvent::Escape, ms(10));
    assert!(!engine.menu().is_open());
    assert!(!engine.menu().scheduler().is_active());
}

#[test]
fn project_rows_get_project_labels() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.project_more;
    open(&mut engine, &mut page, more);

    assert_eq!(labels(&engine), vec!["Rename project", "Delete project"]);
    let placed = engine.menu().host().placement().expect("placed");
    assert_eq!(placed.top, 700.0);
}

#[test]
fn removing_the_trigger_closes_the_menu() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);

    page.doc.remove_anchor(more);
    engine.handle(&mut page.doc, EngineEvent::Mutations, ms(10));
    assert!(!engine.menu().is_open());
    assert_eq!(engine.guard().forced_closes(), 1);
}

#[test]
fn unrelated_mutations_keep_the_menu_open() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);

    let other = page.short_more;
    page.doc.remove_anchor(other);
    engine.handle(&mut page.doc, EngineEvent::Mutations, ms(10));
    assert_eq!(engine.menu().trigger(), Some(more));
    assert_eq!(engine.guard().forced_closes(), 0);
}

#[test]
fn menu_follows_its_row_while_the_sidebar_scrolls() {
    let mut page = Page::build();
    let mut engine = engine();
    let more = page.long_more;
    open(&mut engine, &mut page, more);

    assert!(page.doc.scroll_panel(page.sidebar, 50.0));
    engine.handle(
        &mut page.doc,
        EngineEvent::Scroll(ScrollSource::Panel(page.sidebar)),
        ms(10),
    );
    engine.frame(&page.doc);
    let placed = engine.menu().host().placement().expect("placed");
    assert_eq!(placed.top, 150.0);

    // Scrolled entirely out of the sidebar: the menu closes.
    assert!(page.doc.scroll_panel(page.sidebar, 300.0));
    engine.handle(
        &mut page.doc,
        EngineEvent::Scroll(ScrollSource::Panel(page.sidebar)),
        ms(20),
    );
    engine.frame(&page.doc);
    assert!(!engine.menu().is_open());
}

#[test]
fn tall_menus_near_the_bottom_shift_up_and_scroll() {
    let mut page = Page::build();
    let measure = Px {
        item_height: 60.0,
        ..Px::default()
    };
    let mut engine = engine_with(EngineConfig::default(), measure);
    let more = page.project_more;
    open(&mut engine, &mut page, more);

    // 136 tall, only 92 left below the row: shifted up to keep 96 visible.
    let host = engine.menu().host();
    let placed = host.placement().expect("placed");
    assert_eq!(placed.top, 696.0);
    assert_eq!(host.max_height(), Some(96.0));
    assert_eq!(host.bounds().height, 96.0);

    let inside = Point::new(300.0, 720.0);
    engine.handle(
        &mut page.doc,
        EngineEvent::Wheel {
            point: inside,
            delta: 30.0,
        },
        ms(10),
    );
    assert_eq!(engine.menu().host().scroll_offset(), 30.0);
    engine.handle(
        &mut page.doc,
        EngineEvent::Wheel {
            point: inside,
            delta: 100.0,
        },
        ms(20),
    );
    assert_eq!(engine.menu().host().scroll_offset(), 40.0);

    // Wheel outside the menu does not scroll it.
    engine.handle(
        &mut page.doc,
        EngineEvent::Wheel {
            point: Point::new(900.0, 100.0),
            delta: -40.0,
        },
        ms(30),
    );
    assert_eq!(engine.menu().host().scroll_offset(), 40.0);

    // Scrolled by 40, so y 730 lands in the second item.
    let action = click(&mut engine, &mut page, Point::new(300.0, 730.0), None);
    assert_eq!(
        action.map(|a| (a.action, a.row.key)),
        Some((RowActionKind::Delete, "project-thesis".to_string()))
    );
}
