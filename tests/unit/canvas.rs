use super::*;
use crate::config::GraphicsConfig;
use crate::foundation::core::{Point, Rgba, Size};
use crate::instructions::{Callback, Color, Ellipse, Rectangle};
use crate::render::backend::{Primitive, RecordingBackend};

fn ctx() -> GraphicsContext {
    GraphicsContext::new(GraphicsConfig::default()).unwrap()
}

fn fill_colors(backend: &RecordingBackend) -> Vec<Rgba> {
    backend
        .primitives()
        .iter()
        .filter_map(|p| match p {
            Primitive::Fill { color, .. } => Some(*color),
            _ => None,
        })
        .collect()
}

#[test]
fn recording_scope_appends_in_construction_order() {
    let canvas = Canvas::new(&ctx());
    let (c, e) = {
        let _rec = canvas.record();
        let c = Color::new(1.0, 0.0, 0.0, 1.0).unwrap();
        let e = Ellipse::new(Point::ZERO, Size::new(10.0, 10.0)).unwrap();
        (c, e)
    };
    assert_eq!(canvas.index_of(&Instruction::from(&c)), Some(0));
    assert_eq!(canvas.index_of(&Instruction::from(&e)), Some(1));
    assert!(recording::active_canvas().is_none());

    Rectangle::new(Point::ZERO, Size::new(1.0, 1.0)).unwrap();
    assert_eq!(canvas.len(), 2);
}

#[test]
fn nested_scopes_restore_previous_target() {
    let ctx = ctx();
    let outer = Canvas::new(&ctx);
    let inner = Canvas::new(&ctx);
    let _a = outer.record();
    {
        let _b = inner.record();
        Color::rgb(0.0, 1.0, 0.0).unwrap();
        assert_eq!(recording::recording_depth(), 2);
    }
    Color::rgb(0.0, 0.0, 1.0).unwrap();
    assert_eq!(inner.len(), 1);
    assert_eq!(outer.len(), 1);
}

#[test]
fn owned_instruction_cannot_be_added_twice() {
    let ctx = ctx();
    let a = Canvas::new(&ctx);
    let b = Canvas::new(&ctx);
    let color = Color::rgb(1.0, 1.0, 1.0).unwrap();
    a.add(&color).unwrap();
    assert!(matches!(b.add(&color), Err(GraphicsError::Validation(_))));
    assert!(matches!(a.add(&color), Err(GraphicsError::Validation(_))));

    assert!(a.remove(&Instruction::from(&color)));
    assert!(!a.remove(&Instruction::from(&color)));
    b.add(&color).unwrap();
    assert!(Instruction::from(&color).owner().unwrap().ptr_eq(&b));
}

#[test]
fn canvases_cannot_contain_themselves() {
    let ctx = ctx();
    let root = Canvas::new(&ctx);
    let child = Canvas::new(&ctx);
    assert!(root.add(root.clone()).is_err());
    root.add(child.clone()).unwrap();
    assert!(child.add(root.clone()).is_err());
    assert!(child.parent().unwrap().ptr_eq(&root));
}

#[test]
fn racing_cross_nesting_admits_exactly_one_direction() {
    let ctx = ctx();
    for _ in 0..64 {
        let a = Canvas::new(&ctx);
        let b = Canvas::new(&ctx);
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(2));
        let spawn = |outer: Canvas, inner: Canvas| {
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                outer.add(inner).is_ok()
            })
        };
        let ab = spawn(a.clone(), b.clone());
        let ba = spawn(b.clone(), a.clone());
        let added = [ab.join().unwrap(), ba.join().unwrap()];
        assert_eq!(added.iter().filter(|&&ok| ok).count(), 1);

        a.ask_update();
        assert!(a.needs_redraw());
        let mut backend = RecordingBackend::new(8, 8);
        a.draw(&mut backend).unwrap();
    }
}

#[test]
fn insert_clamps_and_clear_detaches() {
    let canvas = Canvas::new(&ctx());
    let a = Rectangle::new(Point::ZERO, Size::new(1.0, 1.0)).unwrap();
    let b = Rectangle::new(Point::ZERO, Size::new(2.0, 2.0)).unwrap();
    canvas.add(&a).unwrap();
    canvas.insert(0, &b).unwrap();
    assert_eq!(canvas.index_of(&Instruction::from(&b)), Some(0));
    canvas.insert(99, Color::rgb(0.0, 0.0, 0.0).unwrap()).unwrap();
    assert_eq!(canvas.len(), 3);

    canvas.clear();
    assert!(canvas.is_empty());
    assert!(Instruction::from(&a).owner().is_none());
}

#[test]
fn mutation_marks_owner_and_ancestors_dirty() {
    let ctx = ctx();
    let root = Canvas::new(&ctx);
    let child = Canvas::new(&ctx);
    root.add(child.clone()).unwrap();
    let rect = Rectangle::new(Point::ZERO, Size::new(1.0, 1.0)).unwrap();
    child.add(&rect).unwrap();

    let mut backend = RecordingBackend::new(4, 4);
    root.draw(&mut backend).unwrap();
    assert!(!root.needs_redraw());
    assert!(!child.needs_redraw());

    rect.set_size(Size::new(3.0, 3.0)).unwrap();
    assert!(child.needs_redraw());
    assert!(root.needs_redraw());
}

#[test]
fn before_and_after_wrap_the_main_list() {
    let ctx = ctx();
    let canvas = Canvas::new(&ctx);
    let unit = Size::new(1.0, 1.0);
    {
        let _rec = canvas.record();
        Color::rgb(0.0, 1.0, 0.0).unwrap();
        Rectangle::new(Point::ZERO, unit).unwrap();
    }
    {
        let _rec = canvas.after().record();
        Color::rgb(0.0, 0.0, 1.0).unwrap();
        Rectangle::new(Point::ZERO, unit).unwrap();
    }
    {
        let _rec = canvas.before().record();
        Color::rgb(1.0, 0.0, 0.0).unwrap();
        Rectangle::new(Point::ZERO, unit).unwrap();
    }
    let mut backend = RecordingBackend::new(4, 4);
    canvas.draw(&mut backend).unwrap();
    assert_eq!(
        fill_colors(&backend),
        vec![
            Rgba::rgb(1.0, 0.0, 0.0),
            Rgba::rgb(0.0, 1.0, 0.0),
            Rgba::rgb(0.0, 0.0, 1.0)
        ]
    );
    assert!(canvas.before().parent().unwrap().ptr_eq(&canvas));
}

#[test]
fn handlers_may_edit_the_canvas_during_replay() {
    let canvas = Canvas::new(&ctx());
    let target = canvas.clone();
    canvas
        .add(
            Callback::new(move |_| {
                target.add(Rectangle::new(Point::ZERO, Size::new(1.0, 1.0))?)?;
                Ok(())
            })
            .unwrap(),
        )
        .unwrap();
    let mut backend = RecordingBackend::new(4, 4);
    canvas.draw(&mut backend).unwrap();
    assert!(backend.primitives().is_empty());
    assert_eq!(canvas.len(), 2);
    assert!(canvas.needs_redraw());

    canvas.draw(&mut backend).unwrap();
    assert_eq!(backend.primitives().len(), 1);
}
