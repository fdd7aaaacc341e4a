// Light/dark theme handling: resolution order is saved preference, then
// the OS color-scheme query, then light. The flag lives as a `dark` class
// on the document root and mirrors into localStorage under one key.
//
// The store carries a subscriber list so other components can react to a
// toggle without reaching for a globally named hook.

use std::cell::{Cell, RefCell};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent, Window};

pub const STORAGE_KEY: &str = "theme";
const DARK_CLASS: &str = "dark";

const DARK_BUTTON_CLASS: &str = "fixed bottom-6 left-6 z-50 p-3 rounded-full shadow-xl \
     transition-all duration-300 backdrop-blur-md border border-white/20 bg-slate-800/50 \
     text-yellow-400 hover:bg-slate-700 hover:scale-110";
const LIGHT_BUTTON_CLASS: &str = "fixed bottom-6 left-6 z-50 p-3 rounded-full shadow-xl \
     transition-all duration-300 backdrop-blur-md border border-slate-200 bg-white/80 \
     text-slate-700 hover:bg-white hover:scale-110";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

// Saved value wins outright; any unrecognized saved string counts as an
// explicit non-dark choice. Only a missing value defers to the OS.
pub fn resolve(saved: Option<&str>, system_dark: bool) -> Theme {
    match saved {
        Some("dark") => Theme::Dark,
        Some(_) => Theme::Light,
        None => {
            if system_dark {
                Theme::Dark
            } else {
                Theme::Light
            }
        }
    }
}

pub struct ThemeStore {
    current: Cell<Theme>,
    listeners: RefCell<Vec<Box<dyn Fn(Theme)>>>,
}

impl ThemeStore {
    // Reads the persisted preference (falling back to the OS query) and
    // applies it to the document root. Safe to call again after the
    // pre-paint pass; reapplying the same class is a no-op.
    pub fn bootstrap(window: &Window) -> Result<ThemeStore, JsValue> {
        let saved = window
            .local_storage()
            .ok()
            .flatten()
            .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());
        let system_dark = window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .map_or(false, |query| query.matches());
        let theme = resolve(saved.as_deref(), system_dark);

        let store = ThemeStore {
            current: Cell::new(theme),
            listeners: RefCell::new(Vec::new()),
        };
        store.apply(window, theme)?;
        Ok(store)
    }

    pub fn theme(&self) -> Theme {
        self.current.get()
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(Theme) + 'static,
    {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    // Flips the flag, persists it, and fans out to subscribers.
    pub fn toggle(&self, window: &Window) -> Result<Theme, JsValue> {
        let next = self.current.get().toggled();
        self.current.set(next);
        self.apply(window, next)?;
        self.persist(window, next);
        for listener in self.listeners.borrow().iter() {
            listener(next);
        }
        Ok(next)
    }

    fn apply(&self, window: &Window, theme: Theme) -> Result<(), JsValue> {
        let root = window
            .document()
            .and_then(|doc| doc.document_element())
            .ok_or_else(|| JsValue::from_str("no document element"))?;
        match theme {
            Theme::Dark => root.class_list().add_1(DARK_CLASS)?,
            Theme::Light => root.class_list().remove_1(DARK_CLASS)?,
        }
        Ok(())
    }

    // Fire-and-forget; a blocked or full storage only costs persistence
    fn persist(&self, window: &Window, theme: Theme) {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(STORAGE_KEY, theme.as_str());
        }
    }
}

// One-shot pre-paint application, meant to run from a blocking <script>
// before the page renders so the wrong theme never flashes.
pub fn apply_preferred(window: &Window) -> Result<(), JsValue> {
    ThemeStore::bootstrap(window).map(|_| ())
}

// Builds the floating toggle button and appends it to <body>. The click
// handler owns the store for the lifetime of the page.
pub fn mount_toggle_button(
    window: &Window,
    store: std::rc::Rc<ThemeStore>,
) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let button = document
        .create_element("button")?
        .dyn_into::<HtmlElement>()?;
    style_button(&button, store.theme());

    let onclick = {
        let button = button.clone();
        Closure::wrap(Box::new(move |_event: MouseEvent| {
            if let Some(window) = web_sys::window() {
                if let Ok(next) = store.toggle(&window) {
                    style_button(&button, next);
                }
            }
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    // Listener lives until page teardown
    onclick.forget();

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&button)?;
    Ok(())
}

// Icon and tooltip advertise the mode a click switches to
fn style_button(button: &HtmlElement, theme: Theme) {
    match theme {
        Theme::Dark => {
            button.set_class_name(DARK_BUTTON_CLASS);
            button.set_inner_html("\u{2600}\u{fe0f}");
            button.set_title("Switch to light mode");
        }
        Theme::Light => {
            button.set_class_name(LIGHT_BUTTON_CLASS);
            button.set_inner_html("\u{1f319}");
            button.set_title("Switch to dark mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_preference_defers_to_system() {
        assert_eq!(resolve(None, true), Theme::Dark);
        assert_eq!(resolve(None, false), Theme::Light);
    }

    #[test]
    fn saved_preference_overrides_system() {
        assert_eq!(resolve(Some("light"), true), Theme::Light);
        assert_eq!(resolve(Some("dark"), false), Theme::Dark);
    }

    #[test]
    fn unrecognized_saved_value_reads_as_light() {
        assert_eq!(resolve(Some("solarized"), true), Theme::Light);
        assert_eq!(resolve(Some(""), true), Theme::Light);
    }

    #[test]
    fn toggling_twice_restores_the_original_mode() {
        for theme in [Theme::Light, Theme::Dark].iter() {
            assert_eq!(theme.toggled().toggled(), *theme);
            assert_ne!(theme.toggled(), *theme);
        }
    }

    #[test]
    fn storage_values_round_trip_through_resolve() {
        for theme in [Theme::Light, Theme::Dark].iter() {
            assert_eq!(resolve(Some(theme.as_str()), false), *theme);
            assert_eq!(resolve(Some(theme.as_str()), true), *theme);
        }
    }
}
