//! `web-sys` implementation of [`WidgetHost`].
//!
//! Only compiled for the browser build.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use super::widget::{AuthHandler, BridgeError, ScriptLoaded, WidgetHost};

/// Id of the element the widget renders into.
pub const CONTAINER_ID: &str = "telegram-login-container";
const STALE_IFRAME_SELECTOR: &str = "iframe[src*=\"telegram.org/auth\"]";

/// Browser host that injects the script and calls `Telegram.Login.auth`.
#[derive(Default)]
pub struct BrowserWidgetHost {
    // Keeps the JS callback alive while the widget may still call it.
    auth_callback: RefCell<Option<Closure<dyn Fn(JsValue)>>>,
}

impl BrowserWidgetHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn telegram_login() -> Result<JsValue, BridgeError> {
    let window = web_sys::window().ok_or(BridgeError::WidgetUnavailable)?;
    let telegram = js_sys::Reflect::get(&window, &JsValue::from_str("Telegram"))
        .map_err(|_| BridgeError::WidgetUnavailable)?;
    if telegram.is_undefined() || telegram.is_null() {
        return Err(BridgeError::WidgetUnavailable);
    }
    let login =
        js_sys::Reflect::get(&telegram, &JsValue::from_str("Login")).map_err(|_| BridgeError::WidgetUnavailable)?;
    if login.is_undefined() || login.is_null() {
        return Err(BridgeError::WidgetUnavailable);
    }
    Ok(login)
}

fn remove_stale_widgets(document: &web_sys::Document) {
    let Ok(nodes) = document.query_selector_all(STALE_IFRAME_SELECTOR) else {
        return;
    };
    for i in 0..nodes.length() {
        if let Some(el) = nodes.get(i).and_then(|node| node.dyn_into::<web_sys::Element>().ok()) {
            el.remove();
        }
    }
}

fn ensure_container(document: &web_sys::Document) {
    if document.get_element_by_id(CONTAINER_ID).is_some() {
        return;
    }
    let Some(body) = document.body() else {
        return;
    };
    if let Ok(container) = document.create_element("div") {
        container.set_id(CONTAINER_ID);
        let _ = body.append_child(&container);
    }
}

fn js_to_json(value: &JsValue) -> Value {
    if value.is_falsy() {
        return Value::Bool(false);
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

impl WidgetHost for BrowserWidgetHost {
    fn is_script_loaded(&self) -> bool {
        telegram_login().is_ok()
    }

    fn load_script(&self, src: &str, on_done: ScriptLoaded) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            on_done(Err(BridgeError::Script("no document".to_owned())));
            return;
        };
        let script = match document
            .create_element("script")
            .map_err(|e| format!("{e:?}"))
            .and_then(|el| el.dyn_into::<web_sys::HtmlScriptElement>().map_err(|_| "not a script element".to_owned()))
        {
            Ok(script) => script,
            Err(e) => {
                on_done(Err(BridgeError::Script(e)));
                return;
            }
        };
        script.set_src(src);
        script.set_async(true);

        // onload and onerror race for the single completion callback.
        let pending: Rc<RefCell<Option<ScriptLoaded>>> = Rc::new(RefCell::new(Some(on_done)));
        let pending_ok = Rc::clone(&pending);
        let pending_append = Rc::clone(&pending);
        let onload = Closure::once_into_js(move || {
            let done = pending_ok.borrow_mut().take();
            if let Some(done) = done {
                done(Ok(()));
            }
        });
        let src_for_err = src.to_owned();
        let onerror = Closure::once_into_js(move || {
            let done = pending.borrow_mut().take();
            if let Some(done) = done {
                done(Err(BridgeError::Script(format!("failed to load {src_for_err}"))));
            }
        });
        script.set_onload(Some(onload.unchecked_ref()));
        script.set_onerror(Some(onerror.unchecked_ref()));

        let appended = match document.head() {
            Some(head) => head.append_child(&script).map(|_| ()).map_err(|e| format!("{e:?}")),
            None => Err("document has no <head>".to_owned()),
        };
        if let Err(e) = appended {
            let done = pending_append.borrow_mut().take();
            if let Some(done) = done {
                done(Err(BridgeError::Script(e)));
            }
        }
    }

    fn open_widget(&self, options: &Value, on_auth: AuthHandler) -> Result<(), BridgeError> {
        let login = telegram_login()?;
        let auth = js_sys::Reflect::get(&login, &JsValue::from_str("auth"))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or(BridgeError::WidgetUnavailable)?;

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            remove_stale_widgets(&document);
            ensure_container(&document);
        }

        let options_js = js_sys::JSON::parse(&options.to_string()).map_err(|e| BridgeError::Script(format!("{e:?}")))?;
        let callback = Closure::<dyn Fn(JsValue)>::new(move |user: JsValue| on_auth(js_to_json(&user)));
        auth.call2(&login, &options_js, callback.as_ref().unchecked_ref())
            .map_err(|e| BridgeError::Script(format!("{e:?}")))?;

        // Replacing drops the previous widget's callback; its iframe was removed above.
        *self.auth_callback.borrow_mut() = Some(callback);
        Ok(())
    }
}
