mod bootstrap;
mod canvas;
mod controls;
mod dialog;
mod image_processing;
mod runtime_css;
mod worker;

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, Box as GtkBox, FileChooserAction, FileChooserNative,
    FileFilter, Orientation, ResponseType,
};

use crate::clipboard::{
    copy_text_with_fallback, ClipboardBackend, GdkClipboardBackend, WlCopyBackend,
};
use crate::error::{AppError, AppResult};
use crate::preview::{load_backdrop_image, BackdropPreset};
use crate::session::GlassSession;
use crate::settings::SettingsStore;
use crate::theme::ThemeConfig;
use crate::ui::{StyleTokens, LAYOUT_TOKENS};

use bootstrap::{bootstrap_app_runtime, resolve_chrome_colors, resolve_runtime_theme_mode};
use canvas::PreviewCanvas;
use controls::ControlSurface;
use dialog::show_copy_acknowledgment;
use runtime_css::install_runtime_css;
use worker::spawn_worker_action;

const APP_ID: &str = "com.github.frosted.Frosted";
const WINDOW_TITLE: &str = "Frosted";
const IMAGE_MIME_PATTERN: &str = "image/*";

/// Pass only argv[0] so GTK does not try to parse app-specific flags.
fn gtk_launch_args() -> Vec<String> {
    std::env::args().take(1).collect()
}

#[derive(Debug, Default)]
pub struct App;

impl App {
    pub fn new() -> Self {
        Self
    }

    pub fn start(&self) -> AppResult<()> {
        let bootstrap = bootstrap_app_runtime();
        let theme_config = bootstrap.theme_config;
        let backdrop_presets = bootstrap.backdrop_presets;
        let settings_store = bootstrap.settings_store;

        tracing::info!("starting gtk runtime");
        let application = Application::new(Some(APP_ID), gtk4::gio::ApplicationFlags::empty());

        let activate_once = Rc::new(Cell::new(false));
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            let window = build_main_window(
                app,
                LAYOUT_TOKENS,
                &theme_config,
                backdrop_presets.clone(),
                settings_store.clone(),
            );
            tracing::info!("presenting configurator window");
            window.present();
        });

        let exit_code = application.run_with_args(&gtk_launch_args());
        if exit_code != gtk4::glib::ExitCode::SUCCESS {
            return Err(AppError::GtkExit {
                status: format!("{exit_code:?}"),
            });
        }
        Ok(())
    }
}

fn build_main_window(
    app: &Application,
    tokens: StyleTokens,
    theme_config: &ThemeConfig,
    presets: Vec<BackdropPreset>,
    settings_store: SettingsStore,
) -> ApplicationWindow {
    let gtk_settings = gtk4::Settings::default();
    let theme_mode = resolve_runtime_theme_mode(theme_config.mode, gtk_settings.as_ref());
    let colors = resolve_chrome_colors(theme_config, theme_mode);
    install_runtime_css(tokens, &colors, &presets);

    let controls = Rc::new(ControlSurface::build(tokens, &presets));
    let persistence = Rc::new(settings_store);
    let (session, initial_output) =
        GlassSession::restore(persistence.as_ref(), presets, |loaded| {
            controls.sync_from_settings(loaded)
        });
    tracing::debug!(settings = ?session.settings(), "restored settings");
    controls.show_output(&initial_output);
    let session = Rc::new(RefCell::new(session));

    let canvas = Rc::new(PreviewCanvas::new(
        &session,
        tokens.preview_min_width,
        tokens.preview_min_height,
    ));

    let layout = GtkBox::new(Orientation::Horizontal, 0);
    layout.append(controls.widget());
    layout.append(canvas.widget());

    let window = ApplicationWindow::builder()
        .application(app)
        .title(WINDOW_TITLE)
        .default_width(tokens.window_default_width)
        .default_height(tokens.window_default_height)
        .build();
    window.add_css_class("frosted-root");
    window.set_child(Some(&layout));

    {
        let session = session.clone();
        let controls_for_change = controls.clone();
        let canvas = canvas.clone();
        controls.connect_changed(move || {
            let values = controls_for_change.read_values();
            let output = session
                .borrow_mut()
                .apply_controls(values, persistence.as_ref());
            controls_for_change.show_output(&output);
            canvas.queue_redraw();
        });
    }
    {
        let session = session.clone();
        let canvas = canvas.clone();
        controls.connect_preset_selected(move |index| {
            let changed = session.borrow_mut().backdrop_mut().select_preset(index);
            if changed {
                tracing::debug!(index, "selected backdrop preset");
                canvas.queue_redraw();
            }
        });
    }
    {
        let window = window.clone();
        let chooser_slot = Rc::new(RefCell::new(None::<FileChooserNative>));
        controls.connect_upload(move || {
            open_backdrop_chooser(&window, &chooser_slot, &session, &canvas);
        });
    }
    {
        let window = window.clone();
        controls.connect_copy(move |snippet| {
            let backends: [&dyn ClipboardBackend; 2] = [&GdkClipboardBackend, &WlCopyBackend];
            let outcome = copy_text_with_fallback(&backends, &snippet);
            match &outcome {
                Ok(()) => tracing::info!(bytes = snippet.len(), "copied css snippet"),
                Err(err) => tracing::warn!(?err, "failed to copy css snippet"),
            }
            show_copy_acknowledgment(&window, tokens, &outcome);
        });
    }

    window
}

fn open_backdrop_chooser(
    window: &ApplicationWindow,
    chooser_slot: &Rc<RefCell<Option<FileChooserNative>>>,
    session: &Rc<RefCell<GlassSession>>,
    canvas: &Rc<PreviewCanvas>,
) {
    let chooser = FileChooserNative::new(
        Some("Choose background image"),
        Some(window),
        FileChooserAction::Open,
        Some("_Open"),
        Some("_Cancel"),
    );
    chooser.set_modal(true);
    let filter = FileFilter::new();
    filter.set_name(Some("Images"));
    filter.add_mime_type(IMAGE_MIME_PATTERN);
    chooser.add_filter(&filter);

    {
        let chooser_slot = chooser_slot.clone();
        let session = session.clone();
        let canvas = canvas.clone();
        chooser.connect_response(move |dialog, response| {
            if response == ResponseType::Accept {
                match dialog.file().and_then(|file| file.path()) {
                    Some(path) => start_backdrop_load(path, &session, &canvas),
                    None => tracing::warn!("selected backdrop has no local path"),
                }
            }
            chooser_slot.borrow_mut().take();
        });
    }
    chooser.show();
    chooser_slot.borrow_mut().replace(chooser);
}

fn start_backdrop_load(
    path: PathBuf,
    session: &Rc<RefCell<GlassSession>>,
    canvas: &Rc<PreviewCanvas>,
) {
    let ticket = session.borrow_mut().backdrop_mut().begin_image_load();
    tracing::info!(path = %path.display(), "loading backdrop image");

    let session = session.clone();
    let canvas = canvas.clone();
    spawn_worker_action(
        move || load_backdrop_image(&path),
        move |result| {
            if session
                .borrow_mut()
                .backdrop_mut()
                .finish_image_load(ticket, result)
            {
                canvas.queue_redraw();
            }
        },
    );
}
