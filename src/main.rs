use clap::Parser;
use fltk::{app, dialog, enums, misc, prelude::*, window};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use inkpad::caret::{CaretEvent, CaretIndicatorController, CaretLocator};
use inkpad::file_host::NativeFileHost;
use inkpad::fltk_editor::{EditorPane, FltkTextMetrics};
use inkpad::session::EditorSession;
use inkpad::shortcuts::{self, EditorAction, KeyCombo};
use inkpad::statusbar::StatusBar;
use inkpad::theme::{rgb, Theme, ThemeKind};
use inkpad::window_state::{self, AppState, WindowGeometry};

const STATUS_BAR_HEIGHT: i32 = 28;

#[derive(Parser, Debug)]
#[command(name = "inkpad")]
#[command(about = "A minimal plain-text/Markdown editor", long_about = None)]
struct Args {
    /// File to open on startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Color scheme; defaults to the last used one, then dark
    #[arg(short, long, value_enum)]
    theme: Option<ThemeKind>,
}

type Controller = CaretIndicatorController<FltkTextMetrics>;

/// Everything the callbacks need, cloned freely into closures.
#[derive(Clone)]
struct AppContext {
    session: Rc<RefCell<EditorSession>>,
    host: Rc<RefCell<NativeFileHost>>,
    pane: Rc<RefCell<EditorPane>>,
    preview: Rc<RefCell<misc::HelpView>>,
    statusbar: Rc<RefCell<StatusBar>>,
    controller: Rc<RefCell<Controller>>,
    window: window::Window,
}

fn fl_color(color: u32) -> enums::Color {
    let (r, g, b) = rgb(color);
    enums::Color::from_rgb(r, g, b)
}

fn window_title(session: &EditorSession) -> String {
    format!("{} - Inkpad", session.title())
}

/// Recompute the caret indicator and move the overlay.
fn refresh_caret(ctx: &AppContext) {
    let state = {
        let pane = ctx.pane.borrow();
        ctx.controller.borrow_mut().refresh(&*pane)
    };
    ctx.pane.borrow_mut().sync_indicator(&state);
}

/// Feed one widget event through the controller, deferred so the editor
/// has already processed the toolkit event and no borrows overlap.
fn defer_caret_event(ctx: &AppContext, event: CaretEvent) {
    let ctx = ctx.clone();
    app::awake_callback(move || {
        let state = {
            let Ok(pane) = ctx.pane.try_borrow() else {
                return;
            };
            let Ok(mut controller) = ctx.controller.try_borrow_mut() else {
                return;
            };
            controller.handle_event(&*pane, event)
        };
        if let Ok(mut pane) = ctx.pane.try_borrow_mut() {
            pane.sync_indicator(&state);
        }
    });
}

fn sync_chrome(ctx: &AppContext) {
    let session = ctx.session.borrow();
    ctx.statusbar
        .borrow_mut()
        .set_counts_label(&session.counts_label());
    let mut window = ctx.window.clone();
    window.set_label(&window_title(&session));
}

fn run_action(ctx: &AppContext, action: EditorAction) {
    let result = match action {
        EditorAction::NewFile => {
            ctx.session
                .borrow_mut()
                .new_file(&mut *ctx.host.borrow_mut());
            ctx.pane.borrow_mut().set_content("");
            Ok(true)
        }
        EditorAction::OpenFile => {
            let opened = ctx.session.borrow_mut().open(&mut *ctx.host.borrow_mut());
            if opened == Ok(true) {
                let content = ctx.session.borrow().content().to_string();
                ctx.pane.borrow_mut().set_content(&content);
            }
            opened
        }
        EditorAction::SaveFile => ctx.session.borrow_mut().save(&mut *ctx.host.borrow_mut()),
        EditorAction::SaveFileAs => ctx.session.borrow_mut().save_as(&mut *ctx.host.borrow_mut()),
        EditorAction::TogglePreview => {
            ctx.session.borrow_mut().toggle_preview();
            let showing = ctx.session.borrow().show_preview();
            if showing {
                let html = ctx.session.borrow().preview_html();
                ctx.preview.borrow_mut().set_value(&html);
                ctx.pane.borrow_mut().hide();
                ctx.preview.borrow_mut().show();
            } else {
                ctx.preview.borrow_mut().hide();
                ctx.pane.borrow_mut().show();
                ctx.pane.borrow_mut().take_focus();
            }
            ctx.statusbar.borrow_mut().set_preview_active(showing);
            Ok(true)
        }
    };

    if let Err(err) = result {
        tracing::warn!(%err, ?action, "file operation failed");
        dialog::alert_default(&format!("File operation failed: {err}"));
    }

    sync_chrome(ctx);
    refresh_caret(ctx);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let state_path = window_state::state_file_path();
    let stored = state_path
        .as_deref()
        .and_then(window_state::load_state)
        .unwrap_or_default();
    let theme_kind = args.theme.or(stored.theme).unwrap_or(ThemeKind::Dark);
    let theme = Theme::for_kind(theme_kind);
    let geometry = stored.geometry;

    let app = app::App::default();
    let mut wind = window::Window::default()
        .with_size(geometry.width, geometry.height)
        .with_label("Inkpad");
    wind.set_pos(geometry.x, geometry.y);
    wind.set_color(fl_color(theme.background_color));

    wind.begin();
    let editor_h = geometry.height - STATUS_BAR_HEIGHT;
    let pane = Rc::new(RefCell::new(EditorPane::new(
        0,
        0,
        geometry.width,
        editor_h,
        &theme,
    )));
    let mut preview = misc::HelpView::new(0, 0, geometry.width, editor_h, None);
    preview.set_frame(enums::FrameType::FlatBox);
    preview.hide();
    let statusbar = Rc::new(RefCell::new(StatusBar::new(
        0,
        editor_h,
        geometry.width,
        STATUS_BAR_HEIGHT,
        &theme,
    )));
    wind.end();
    wind.make_resizable(true);

    let ctx = AppContext {
        session: Rc::new(RefCell::new(EditorSession::new())),
        host: Rc::new(RefCell::new(NativeFileHost::new())),
        pane: pane.clone(),
        preview: Rc::new(RefCell::new(preview)),
        statusbar: statusbar.clone(),
        controller: Rc::new(RefCell::new(Controller::new(CaretLocator::new(
            FltkTextMetrics,
        )))),
        window: wind.clone(),
    };

    // File handed over on the command line skips the dialog.
    if let Some(path) = &args.file {
        match ctx.host.borrow_mut().open_path(path) {
            Ok(opened) => {
                ctx.session.borrow_mut().adopt_opened(opened);
                let content = ctx.session.borrow().content().to_string();
                ctx.pane.borrow_mut().set_content(&content);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "could not open file from command line");
            }
        }
    }

    // Content changes: session, counts, title, caret.
    {
        let mut editor = pane.borrow().widget();
        editor.set_trigger(enums::CallbackTrigger::Changed);
        let ctx2 = ctx.clone();
        editor.set_callback(move |_| {
            let ctx3 = ctx2.clone();
            app::awake_callback(move || {
                let content = ctx3.pane.borrow().content_text();
                ctx3.session.borrow_mut().update_content(&content);
                sync_chrome(&ctx3);
                let state = {
                    let pane = ctx3.pane.borrow();
                    ctx3.controller
                        .borrow_mut()
                        .handle_event(&*pane, CaretEvent::ContentChanged)
                };
                ctx3.pane.borrow_mut().sync_indicator(&state);
            });
        });
    }

    // Selection, scroll and focus events on the editor widget. The handler
    // never consumes anything; the editor processes the event first and
    // the recomputation runs afterwards via awake.
    {
        let mut editor = pane.borrow().widget();
        let ctx2 = ctx.clone();
        editor.handle(move |_, event| {
            let caret_event = match event {
                enums::Event::Push
                | enums::Event::Drag
                | enums::Event::Released
                | enums::Event::KeyDown
                | enums::Event::KeyUp => Some(CaretEvent::SelectionChanged),
                enums::Event::MouseWheel => Some(CaretEvent::Scrolled),
                enums::Event::Focus => Some(CaretEvent::FocusGained),
                enums::Event::Unfocus => Some(CaretEvent::FocusLost),
                _ => None,
            };
            if let Some(caret_event) = caret_event {
                defer_caret_event(&ctx2, caret_event);
            }
            false
        });
    }

    // Status bar buttons.
    {
        let ctx2 = ctx.clone();
        statusbar
            .borrow_mut()
            .on_new(move || run_action(&ctx2, EditorAction::NewFile));
        let ctx2 = ctx.clone();
        statusbar
            .borrow_mut()
            .on_open(move || run_action(&ctx2, EditorAction::OpenFile));
        let ctx2 = ctx.clone();
        statusbar
            .borrow_mut()
            .on_save(move || run_action(&ctx2, EditorAction::SaveFile));
        let ctx2 = ctx.clone();
        statusbar
            .borrow_mut()
            .on_toggle_preview(move || run_action(&ctx2, EditorAction::TogglePreview));
    }

    // Keyboard shortcuts at the window level.
    {
        let ctx2 = ctx.clone();
        wind.handle(move |_, event| {
            if event != enums::Event::KeyDown {
                return false;
            }
            let state = app::event_state();
            #[cfg(target_os = "macos")]
            let command = state.contains(enums::Shortcut::Command);
            #[cfg(not(target_os = "macos"))]
            let command = state.contains(enums::Shortcut::Ctrl);
            let shift = state.contains(enums::Shortcut::Shift);
            let key = app::event_key();
            let Some(pressed) = shortcuts::BOUND_KEYS.iter().copied().find(|&c| {
                key == enums::Key::from_char(c)
                    || key == enums::Key::from_char(c.to_ascii_uppercase())
            }) else {
                return false;
            };
            match shortcuts::action_for(KeyCombo {
                command,
                shift,
                key: pressed,
            }) {
                Some(action) => {
                    let ctx3 = ctx2.clone();
                    app::awake_callback(move || run_action(&ctx3, action));
                    true
                }
                None => false,
            }
        });
    }

    // Manual layout on resize. The new width changes where text wraps, so
    // the cached caret geometry is stale until recomputed.
    {
        let ctx2 = ctx.clone();
        wind.resize_callback(move |_, _x, _y, w, h| {
            let editor_h = h - STATUS_BAR_HEIGHT;
            ctx2.pane.borrow_mut().resize(0, 0, w, editor_h);
            ctx2.preview.borrow_mut().resize(0, 0, w, editor_h);
            ctx2.statusbar
                .borrow_mut()
                .resize(0, editor_h, w, STATUS_BAR_HEIGHT);
            ctx2.controller.borrow_mut().mark_style_stale();
            let ctx3 = ctx2.clone();
            app::awake_callback(move || refresh_caret(&ctx3));
        });
    }

    // Persist geometry and theme on close.
    {
        let state_path = state_path.clone();
        wind.set_callback(move |w| {
            if app::event() == enums::Event::Close {
                if let Some(path) = &state_path {
                    let state = AppState {
                        geometry: WindowGeometry {
                            x: w.x(),
                            y: w.y(),
                            width: w.w(),
                            height: w.h(),
                        },
                        theme: Some(theme_kind),
                    };
                    if let Err(err) = window_state::save_state(path, &state) {
                        tracing::warn!(%err, "failed to save window state");
                    }
                }
                app::quit();
            }
        });
    }

    wind.show();
    sync_chrome(&ctx);
    refresh_caret(&ctx);
    ctx.pane.borrow_mut().take_focus();

    app.run().unwrap();
}
