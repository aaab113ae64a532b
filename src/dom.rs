//! Browser binding: a `Stage` backed by the page DOM, input wiring and the
//! animation-frame pump that drives the game clock.
//!
//! Expected page elements: `#playfield`, `#dog` (the target), `#counter`,
//! `#modal` and `#reset`. Heart input is delegated to the playfield and
//! resolved through each heart's `data-heart-id`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window, window};

use crate::config::GameConfig;
use crate::error::BootError;
use crate::game::Game;
use crate::geometry::{Point, Rect, Size};
use crate::heart::{Capabilities, HEART_SVG, Heart, HeartClass, HeartId};
use crate::stage::{Corner, Hit, Probe, Stage, counter_label};

const HEART_ID_ATTR: &str = "data-heart-id";

pub struct DomStage {
    window: Window,
    document: Document,
    playfield: HtmlElement,
    target: HtmlElement,
    counter: HtmlElement,
    modal: HtmlElement,
    hearts: HashMap<HeartId, HtmlElement>,
}

fn html_element(doc: &Document, id: &'static str) -> Result<HtmlElement, BootError> {
    doc.get_element_by_id(id)
        .ok_or(BootError::MissingElement(id))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| BootError::WrongElementType(id))
}

impl DomStage {
    pub fn from_document(window: Window, document: Document) -> Result<Self, BootError> {
        Ok(Self {
            playfield: html_element(&document, "playfield")?,
            target: html_element(&document, "dog")?,
            counter: html_element(&document, "counter")?,
            modal: html_element(&document, "modal")?,
            window,
            document,
            hearts: HashMap::new(),
        })
    }

    fn create_heart_element(&self, heart: &Heart) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        match heart.variant.class() {
            Some(variant) => el.set_class_name(&format!("heart {variant}")),
            None => el.set_class_name("heart"),
        }
        el.set_attribute(HEART_ID_ATTR, &heart.id.0.to_string())?;

        let style = el.style();
        let size = format!("{}px", heart.style.size);
        style.set_property("width", &size)?;
        style.set_property("height", &size)?;
        style.set_property("left", &format!("{}px", heart.position.x))?;
        style.set_property("top", &format!("{}px", heart.position.y))?;
        style.set_property("z-index", &heart.style.z_index.to_string())?;
        style.set_property("--rotation", &format!("{}deg", heart.style.rotation_deg))?;
        style.set_property(
            "transform",
            &format!("rotate({}deg)", heart.style.rotation_deg),
        )?;

        if heart.style.decorated {
            el.set_inner_html(HEART_SVG);
        }
        Ok(el)
    }
}

fn toggle_class(el: &Element, class: &str, on: bool) {
    if let Err(err) = el.class_list().toggle_with_force(class, on) {
        warn!(class, on, ?err, "failed to toggle class");
    }
}

impl Probe for DomStage {
    fn viewport(&self) -> Size {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(
            read(self.window.inner_width()),
            read(self.window.inner_height()),
        )
    }

    fn target_rect(&self) -> Rect {
        let r = self.target.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn element_at(&self, point: Point) -> Hit {
        let Some(el) = self
            .document
            .element_from_point(point.x as f32, point.y as f32)
        else {
            return Hit::Nothing;
        };
        let node: &web_sys::Node = el.as_ref();
        if self.target.contains(Some(node)) {
            return Hit::Target;
        }
        match heart_id_of(&el) {
            Some(id) => Hit::Heart(id),
            None => Hit::Other,
        }
    }
}

impl Stage for DomStage {
    fn mount_heart(&mut self, heart: &Heart) {
        let mounted = self
            .create_heart_element(heart)
            .and_then(|el| self.playfield.append_child(&el).map(|_| el));
        match mounted {
            Ok(el) => {
                self.hearts.insert(heart.id, el);
            }
            Err(err) => warn!(heart = heart.id.0, ?err, "failed to mount heart"),
        }
    }

    fn unmount_heart(&mut self, id: HeartId) {
        if let Some(el) = self.hearts.remove(&id) {
            el.remove();
        }
    }

    fn set_heart_class(&mut self, id: HeartId, class: HeartClass, on: bool) {
        if let Some(el) = self.hearts.get(&id) {
            toggle_class(el, class.as_str(), on);
        }
    }

    fn place_target(&mut self, corner: Corner, inset: f64) {
        let pct = format!("{}%", inset * 100.0);
        let style = self.target.style();
        let (top, bottom) = if corner.is_top() {
            (pct.as_str(), "auto")
        } else {
            ("auto", pct.as_str())
        };
        let (left, right) = if corner.is_left() {
            (pct.as_str(), "auto")
        } else {
            ("auto", pct.as_str())
        };
        for (prop, value) in [("top", top), ("bottom", bottom), ("left", left), ("right", right)] {
            if let Err(err) = style.set_property(prop, value) {
                warn!(prop, ?err, "failed to place target");
            }
        }
    }

    fn set_target_hidden(&mut self, hidden: bool) {
        toggle_class(&self.target, "is-hidden", hidden);
    }

    fn set_counter(&mut self, cleared: u32) {
        self.counter.set_text_content(Some(&counter_label(cleared)));
    }

    fn set_modal_visible(&mut self, visible: bool) {
        toggle_class(&self.modal, "is-visible", visible);
        let aria = if visible { "false" } else { "true" };
        if let Err(err) = self.modal.set_attribute("aria-hidden", aria) {
            warn!(?err, "failed to set modal aria-hidden");
        }
    }
}

fn heart_id_of(el: &Element) -> Option<HeartId> {
    let heart = el.closest(&format!("[{HEART_ID_ATTR}]")).ok()??;
    heart.get_attribute(HEART_ID_ATTR)?.parse().ok().map(HeartId)
}

fn heart_id_from_event(evt: &web_sys::Event) -> Option<HeartId> {
    let el: Element = evt.target()?.dyn_into().ok()?;
    heart_id_of(&el)
}

/// Media-query flags, read once.
pub fn capabilities(win: &Window) -> Capabilities {
    let matches = |query: &str| {
        win.match_media(query)
            .ok()
            .flatten()
            .is_some_and(|m| m.matches())
    };
    Capabilities {
        hover: matches("(hover: hover)"),
        reduced_motion: matches("(prefers-reduced-motion: reduce)"),
    }
}

// One game per page; filled by `boot`.
thread_local! {
    static GAME: RefCell<Option<Game<DomStage>>> = RefCell::new(None);
}

/// Run `f` against the live game. Re-entrant calls are dropped.
pub fn with_game(f: impl FnOnce(&mut Game<DomStage>)) {
    GAME.with(|cell| {
        if let Ok(mut slot) = cell.try_borrow_mut() {
            if let Some(game) = slot.as_mut() {
                f(game);
            }
        }
    });
}

fn is_booted() -> bool {
    GAME.with(|cell| cell.borrow().is_some())
}

/// Wire the game to the page and start the first round.
///
/// A page hosts one game: booting again only resets it, and `config` is
/// ignored in favour of the one the game was started with.
pub fn boot(config: GameConfig) -> Result<(), BootError> {
    if is_booted() {
        with_game(|g| {
            if *g.config() != config {
                warn!("game already running; new config ignored, resetting instead");
            }
            g.reset();
        });
        return Ok(());
    }
    config.validate()?;
    let win = window().ok_or(BootError::NoWindow)?;
    let doc = win.document().ok_or(BootError::NoDocument)?;
    let reset_button = html_element(&doc, "reset")?;
    let caps = capabilities(&win);
    let stage = DomStage::from_document(win.clone(), doc)?;
    let playfield = stage.playfield.clone();
    let target = stage.target.clone();

    let mut game = Game::new(stage, config, caps);
    if let Some(now) = win.performance().map(|p| p.now()) {
        game.tick(now);
    }
    game.reset();
    GAME.with(|cell| cell.replace(Some(game)));

    // Heart hover (mouseover bubbles, mouseenter does not)
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            if let Some(id) = heart_id_from_event(&evt) {
                with_game(|g| g.hover_heart(id));
            }
        }) as Box<dyn FnMut(_)>);
        playfield.add_event_listener_with_callback("mouseover", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Heart press
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            if let Some(id) = heart_id_from_event(&evt) {
                with_game(|g| g.press_heart(id));
            }
        }) as Box<dyn FnMut(_)>);
        playfield
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Direct click on the target
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_game(|g| g.click_target());
        }) as Box<dyn FnMut(_)>);
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Reset control
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_game(|g| g.reset());
        }) as Box<dyn FnMut(_)>);
        reset_button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    tracing::info!(hover = caps.hover, reduced_motion = caps.reduced_motion, "heart hunt booted");
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_game(|game| game.tick(ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
