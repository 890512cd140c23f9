//! DOM shell — everything that touches web-sys.
//!
//! Holds the single [`Manager`] in a `thread_local!` (the Web page keeps the
//! WASM module alive, so state persists across calls for the whole browser
//! session), wires input listeners and the requestAnimationFrame chain, and
//! applies manager effects to the hosting page's elements:
//! `game-container`, `gameCanvas`, `htmlGameArea`, `game-title`,
//! `game-score`, `game-menu`, `menu-title`, `menu-score`.
//!
//! At most one frame chain is alive at a time: starting or closing a game
//! cancels the pending callback outright, and the manager's epoch check
//! catches anything already in flight.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, MouseEvent,
    TouchEvent, Window, console,
};

use crate::config::GameConfig;
use crate::games::aim::AimGame;
use crate::games::memory::Flip;
use crate::games::particle::ParticleGame;
use crate::manager::{Manager, MatchOutcome, Tick};
use crate::session::{self, EndState, GameKind};
use crate::surface::{self, SurfaceRect};

struct App {
    manager: Manager,
    /// Epoch of the most recent `start`, tagged onto frames and timeouts.
    loop_epoch: u64,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    html_area: HtmlElement,
    title: Element,
    score: Element,
    menu: Element,
    menu_title: Element,
    menu_score: Element,
    /// Pending requestAnimationFrame handle, if a frame is scheduled.
    raf_id: Option<i32>,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
    /// The shared frame callback; one closure reused for every frame.
    static FRAME_CB: RefCell<Option<Closure<dyn FnMut()>>> = RefCell::new(None);
    /// Tuning applied to the manager; may be set before the App exists.
    static CONFIG: RefCell<GameConfig> = RefCell::new(GameConfig::default());
}

/// Log a fault without crashing the host page. ResizeObserver loop noise is
/// benign and suppressed, as in the original page's error hook.
pub(crate) fn report(err: &JsValue) {
    if let Some(msg) = err.as_string() {
        if msg.contains("ResizeObserver") {
            return;
        }
    }
    console::error_2(&JsValue::from_str("Game error:"), err);
}

fn win() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<Document, JsValue> {
    win()?.document().ok_or_else(|| JsValue::from_str("no document"))
}

fn element(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))
}

fn html_element(doc: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    element(doc, id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not an HtmlElement", id)))
}

/// Replace the tuning config, reaching the live manager if one exists.
pub(crate) fn configure(json: &str) -> Result<(), JsValue> {
    let cfg = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e))?;
    CONFIG.with(|c| *c.borrow_mut() = cfg.clone());
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            app.manager.set_config(cfg);
        }
    });
    Ok(())
}

/// Look up page elements and install listeners, once per page lifetime.
fn ensure_app() -> Result<(), JsValue> {
    if APP.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }

    let doc = document()?;
    let canvas: HtmlCanvasElement = element(&doc, "gameCanvas")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("#gameCanvas is not a canvas"))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("2d context has unexpected type"))?;

    let app = App {
        manager: Manager::new(CONFIG.with(|c| c.borrow().clone())),
        loop_epoch: 0,
        container: html_element(&doc, "game-container")?,
        canvas: canvas.clone(),
        ctx,
        html_area: html_element(&doc, "htmlGameArea")?,
        title: element(&doc, "game-title")?,
        score: element(&doc, "game-score")?,
        menu: element(&doc, "game-menu")?,
        menu_title: element(&doc, "menu-title")?,
        menu_score: element(&doc, "menu-score")?,
        raf_id: None,
    };
    APP.with(|cell| *cell.borrow_mut() = Some(app));

    FRAME_CB.with(|cb| {
        *cb.borrow_mut() = Some(Closure::wrap(Box::new(|| {
            if let Err(err) = frame_step() {
                report(&err);
            }
        }) as Box<dyn FnMut()>));
    });

    install_listeners(&canvas)?;
    Ok(())
}

fn install_listeners(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let press = Closure::wrap(Box::new(move |e: MouseEvent| {
        if let Err(err) = handle_press(e.client_x() as f64, e.client_y() as f64) {
            report(&err);
        }
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousedown", press.as_ref().unchecked_ref())?;
    press.forget();

    let touch_press = Closure::wrap(Box::new(move |e: TouchEvent| {
        e.prevent_default();
        if let Some(t) = e.changed_touches().get(0) {
            if let Err(err) = handle_press(t.client_x() as f64, t.client_y() as f64) {
                report(&err);
            }
        }
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("touchstart", touch_press.as_ref().unchecked_ref())?;
    touch_press.forget();

    let pointer = Closure::wrap(Box::new(move |e: MouseEvent| {
        if let Err(err) = handle_move(e.client_x() as f64, e.client_y() as f64) {
            report(&err);
        }
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousemove", pointer.as_ref().unchecked_ref())?;
    pointer.forget();

    let touch_move = Closure::wrap(Box::new(move |e: TouchEvent| {
        e.prevent_default();
        if let Some(t) = e.changed_touches().get(0) {
            if let Err(err) = handle_move(t.client_x() as f64, t.client_y() as f64) {
                report(&err);
            }
        }
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("touchmove", touch_move.as_ref().unchecked_ref())?;
    touch_move.forget();

    let resize = Closure::wrap(Box::new(move || {
        if let Err(err) = handle_resize() {
            report(&err);
        }
    }) as Box<dyn FnMut()>);
    win()?.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
    resize.forget();

    Ok(())
}

/// Start (or switch to) a zone from the menu.
pub(crate) fn start(kind: GameKind) -> Result<(), JsValue> {
    ensure_app()?;
    let canvas_game = APP.with(|cell| -> Result<bool, JsValue> {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            return Err(JsValue::from_str("app not initialized"));
        };

        if let Some(id) = app.raf_id.take() {
            win()?.cancel_animation_frame(id)?;
        }
        app.loop_epoch = app.manager.start(kind);

        app.container.style().set_property("display", "flex")?;
        app.menu.class_list().add_1("hidden")?;
        app.title.set_text_content(Some(kind.title()));
        app.score.set_text_content(Some(kind.initial_score_label()));

        if kind.uses_canvas() {
            app.canvas.class_list().remove_1("hidden")?;
            app.html_area.class_list().add_1("hidden")?;
            app.html_area.set_inner_html("");
            resize_canvas(app)?;
        } else {
            app.canvas.class_list().add_1("hidden")?;
            app.html_area.class_list().remove_1("hidden")?;
            build_board(app)?;
        }
        Ok(kind.uses_canvas())
    })?;

    if canvas_game {
        schedule_frame()?;
    }
    Ok(())
}

/// Re-enter whichever zone was last active.
pub(crate) fn restart() -> Result<(), JsValue> {
    let kind = APP.with(|cell| cell.borrow().as_ref().and_then(|a| a.manager.session.current()));
    match kind {
        Some(kind) => start(kind),
        None => Ok(()),
    }
}

/// Hide the game overlay and cancel any pending frame.
pub(crate) fn close() -> Result<(), JsValue> {
    APP.with(|cell| -> Result<(), JsValue> {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            return Ok(());
        };
        if let Some(id) = app.raf_id.take() {
            win()?.cancel_animation_frame(id)?;
        }
        app.container.style().set_property("display", "none")?;
        app.manager.close();
        Ok(())
    })
}

/// Recompute logical size from the canvas rect (viewport fallback when layout
/// hasn't settled), scale the backing buffer by DPR, and normalize the draw
/// context so all drawing uses logical CSS pixels.
fn resize_canvas(app: &mut App) -> Result<(), JsValue> {
    let win = win()?;
    let rect = app.canvas.get_bounding_client_rect();
    let rect = SurfaceRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    };
    let vw = win.inner_width()?.as_f64().unwrap_or(0.0);
    let vh = win.inner_height()?.as_f64().unwrap_or(0.0);
    let (w, h) = surface::logical_size(&rect, vw, vh);

    let dpr = win.device_pixel_ratio();
    let (bw, bh) = surface::backing_size(w, h, dpr);
    app.canvas.set_width(bw);
    app.canvas.set_height(bh);
    // Resizing resets the context transform, so the scale never compounds.
    app.ctx.scale(dpr, dpr)?;

    app.manager.session.set_logical_size(w, h);
    Ok(())
}

fn handle_resize() -> Result<(), JsValue> {
    APP.with(|cell| -> Result<(), JsValue> {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            return Ok(());
        };
        let session = &app.manager.session;
        if session.active() && session.current().is_some_and(GameKind::uses_canvas) {
            resize_canvas(app)?;
        }
        Ok(())
    })
}

// ── Frame loop ────────────────────────────────────────────────────

enum After {
    Stop,
    Continue,
    Menu(EndState),
}

fn schedule_frame() -> Result<(), JsValue> {
    let id = FRAME_CB.with(|cb| -> Result<i32, JsValue> {
        let borrow = cb.borrow();
        let closure = borrow
            .as_ref()
            .ok_or_else(|| JsValue::from_str("frame callback missing"))?;
        win()?.request_animation_frame(closure.as_ref().unchecked_ref())
    })?;
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            app.raf_id = Some(id);
        }
    });
    Ok(())
}

fn frame_step() -> Result<(), JsValue> {
    let after = APP.with(|cell| -> Result<After, JsValue> {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            return Ok(After::Stop);
        };
        app.raf_id = None;

        let epoch = app.loop_epoch;
        match app.manager.tick(epoch) {
            Tick::Skip => Ok(After::Stop),
            Tick::Frame => {
                let (w, h) =
                    (app.manager.session.logical_width, app.manager.session.logical_height);
                if let Some(aim) = app.manager.aim() {
                    draw_aim(&app.ctx, aim, w, h)?;
                } else if let Some(particle) = app.manager.particle() {
                    draw_particles(&app.ctx, particle, w, h)?;
                }
                Ok(After::Continue)
            }
            Tick::Ended(end) => {
                // Render the ending tick (its last-spawned target included)
                // before the menu covers the canvas.
                let (w, h) =
                    (app.manager.session.logical_width, app.manager.session.logical_height);
                if let Some(aim) = app.manager.aim() {
                    draw_aim(&app.ctx, aim, w, h)?;
                }
                Ok(After::Menu(end))
            }
        }
    })?;

    match after {
        After::Continue => schedule_frame(),
        After::Menu(end) => show_menu(&end),
        After::Stop => Ok(()),
    }
}

fn draw_aim(ctx: &CanvasRenderingContext2d, aim: &AimGame, w: f64, h: f64) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, w, h);

    for t in aim.targets() {
        ctx.begin_path();
        ctx.arc(t.x, t.y, t.radius, 0.0, std::f64::consts::TAU)?;
        ctx.set_fill_style_str(&format!("hsl({}, 70%, 60%)", t.hue));
        ctx.fill();
        ctx.set_line_width(3.0);
        ctx.set_stroke_style_str("white");
        ctx.stroke();

        // Center marker
        ctx.begin_path();
        ctx.arc(t.x, t.y, 5.0, 0.0, std::f64::consts::TAU)?;
        ctx.set_fill_style_str("white");
        ctx.fill();
    }

    // Timer bar along the bottom edge
    ctx.set_fill_style_str("#3b82f6");
    ctx.fill_rect(0.0, h - 6.0, aim.time_fraction() * w, 6.0);
    Ok(())
}

fn draw_particles(
    ctx: &CanvasRenderingContext2d,
    game: &ParticleGame,
    w: f64,
    h: f64,
) -> Result<(), JsValue> {
    // Low-opacity overlay instead of a clear: old frames fade into trails.
    ctx.set_fill_style_str(&format!("rgba(15, 23, 42, {})", game.trail_alpha()));
    ctx.fill_rect(0.0, 0.0, w, h);

    // Just-expired particles still get this frame before they vanish.
    for p in game.particles().iter().chain(game.dying()) {
        ctx.begin_path();
        ctx.arc(p.x, p.y, p.size, 0.0, std::f64::consts::TAU)?;
        ctx.set_fill_style_str(&format!("hsl({}, 100%, 50%)", p.hue));
        ctx.fill();
    }
    Ok(())
}

fn show_menu(end: &EndState) -> Result<(), JsValue> {
    APP.with(|cell| -> Result<(), JsValue> {
        let borrow = cell.borrow();
        let Some(app) = borrow.as_ref() else {
            return Ok(());
        };
        app.menu.class_list().remove_1("hidden")?;
        app.menu_title.set_text_content(Some(&end.title));
        app.menu_score.set_text_content(Some(&end.summary));
        Ok(())
    })
}

// ── Input ─────────────────────────────────────────────────────────

fn logical_point(app: &App, client_x: f64, client_y: f64) -> (f64, f64) {
    let rect = app.canvas.get_bounding_client_rect();
    let rect = SurfaceRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    };
    surface::to_logical(&rect, client_x, client_y)
}

fn handle_press(client_x: f64, client_y: f64) -> Result<(), JsValue> {
    APP.with(|cell| -> Result<(), JsValue> {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            return Ok(());
        };
        let (x, y) = logical_point(app, client_x, client_y);
        let epoch = app.loop_epoch;
        if let Some(score) = app.manager.press(epoch, x, y) {
            app.score.set_text_content(Some(&session::score_label(score)));
        }
        Ok(())
    })
}

fn handle_move(client_x: f64, client_y: f64) -> Result<(), JsValue> {
    APP.with(|cell| -> Result<(), JsValue> {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            return Ok(());
        };
        let (x, y) = logical_point(app, client_x, client_y);
        let epoch = app.loop_epoch;
        app.manager.pointer_move(epoch, x, y);
        Ok(())
    })
}

// ── Memory board ──────────────────────────────────────────────────

/// Build one clickable tile per dealt card inside a fresh board container.
fn build_board(app: &mut App) -> Result<(), JsValue> {
    let doc = document()?;
    let board = doc.create_element("div")?;
    board.set_class_name("grid-game-board");

    let count = app.manager.memory().map(|m| m.cards().len()).unwrap_or(0);
    for index in 0..count {
        let tile = doc.create_element("div")?;
        tile.set_class_name("memory-card");
        let click = Closure::wrap(Box::new(move || {
            if let Err(err) = handle_tile_click(index) {
                report(&err);
            }
        }) as Box<dyn FnMut()>);
        tile.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        click.forget();
        board.append_child(&tile)?;
    }

    app.html_area.set_inner_html("");
    app.html_area.append_child(&board)?;
    Ok(())
}

fn tile_at(app: &App, index: usize) -> Result<Option<Element>, JsValue> {
    app.html_area
        .query_selector(&format!(".memory-card:nth-child({})", index + 1))
}

fn handle_tile_click(index: usize) -> Result<(), JsValue> {
    let pending = APP.with(|cell| -> Result<Option<(u64, u32)>, JsValue> {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            return Ok(None);
        };
        let flip = app.manager.flip_card(index);
        if flip == Flip::Ignored {
            return Ok(None);
        }

        // Reveal the face.
        if let Some(tile) = tile_at(app, index)? {
            tile.class_list().add_1("flipped")?;
            let glyph = app.manager.memory().map(|m| m.cards()[index].glyph);
            tile.set_text_content(glyph);
        }

        if flip == Flip::Pending {
            let moves = app.manager.session.score();
            app.score.set_text_content(Some(&session::moves_label(moves)));
            let delay = app
                .manager
                .memory()
                .map(|m| m.resolve_delay_ms())
                .unwrap_or(800);
            Ok(Some((app.loop_epoch, delay)))
        } else {
            Ok(None)
        }
    })?;

    if let Some((epoch, delay_ms)) = pending {
        schedule_resolve(epoch, delay_ms)?;
    }
    Ok(())
}

/// Defer pair resolution so the player sees both faces. The closure carries
/// the epoch it was scheduled under; a session closed in the meantime makes
/// the resolution a no-op.
fn schedule_resolve(epoch: u64, delay_ms: u32) -> Result<(), JsValue> {
    let cb = Closure::once(move || {
        if let Err(err) = finish_resolve(epoch) {
            report(&err);
        }
    });
    win()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        delay_ms.min(i32::MAX as u32) as i32,
    )?;
    cb.forget();
    Ok(())
}

fn finish_resolve(epoch: u64) -> Result<(), JsValue> {
    let ended = APP.with(|cell| -> Result<Option<EndState>, JsValue> {
        let mut borrow = cell.borrow_mut();
        let Some(app) = borrow.as_mut() else {
            return Ok(None);
        };
        match app.manager.resolve_match(epoch) {
            MatchOutcome::Inactive => Ok(None),
            MatchOutcome::Matched { cards } => {
                for index in cards {
                    if let Some(tile) = tile_at(app, index)? {
                        tile.class_list().add_1("matched")?;
                    }
                }
                Ok(None)
            }
            MatchOutcome::Mismatched { cards } => {
                for index in cards {
                    if let Some(tile) = tile_at(app, index)? {
                        tile.class_list().remove_1("flipped")?;
                        tile.set_text_content(None);
                    }
                }
                Ok(None)
            }
            MatchOutcome::Won { cards, end } => {
                for index in cards {
                    if let Some(tile) = tile_at(app, index)? {
                        tile.class_list().add_1("matched")?;
                    }
                }
                Ok(Some(end))
            }
        }
    })?;

    if let Some(end) = ended {
        show_menu(&end)?;
    }
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn close_before_any_start_is_a_noop() {
        assert!(close().is_ok());
    }

    #[wasm_bindgen_test]
    fn resize_observer_noise_is_swallowed() {
        // Must not throw; the message is filtered before reaching the console.
        report(&JsValue::from_str("ResizeObserver loop limit exceeded"));
    }

    #[wasm_bindgen_test]
    fn configure_accepts_partial_override() {
        assert!(configure(r#"{"particle":{"hue_step":4.0}}"#).is_ok());
        assert!(configure("not json").is_err());
    }
}
