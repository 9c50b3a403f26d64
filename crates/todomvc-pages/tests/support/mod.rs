//! In-process stand-in for todomvc.com and its EmberJS example.
//!
//! `FakeTodoMvc` answers to the same locators the page objects use and
//! mimics the app's observable behaviour: the landing page link, adding
//! items with Enter, toggling, inline editing, filters, bulk actions and a
//! close control that only reacts to script clicks.

#![allow(dead_code)]

use pageprobe::driver::{keys, PointerAction};
use pageprobe::page::JS_CLICK_SCRIPT;
use pageprobe::{
    ActionChain, Driver, ElementHandle, Locator, PageObject, ProbeError, ProbeResult, Session,
    SuiteConfig, WaitOptions,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use todomvc_pages::ember_page::{self, PATH};
use todomvc_pages::main_page::EMBERJS_LINK;
use todomvc_pages::{EmberTodoPage, TodoMvcMainPage};

/// Base URL the fake serves
pub const BASE_URL: &str = "http://todomvc.test";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone)]
struct Todo {
    id: u32,
    title: String,
    completed: bool,
}

/// DOM nodes the fake renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    EmberLink,
    Entry,
    ToggleAll,
    ClearCompleted,
    Filter(Filter),
    Item(u32),
    Label(u32),
    Destroy(u32),
    Checkbox(u32),
    Editor(u32),
}

impl Node {
    fn handle(self) -> ElementHandle {
        let id = match self {
            Self::EmberLink => "link-emberjs".to_string(),
            Self::Entry => "new-todo".to_string(),
            Self::ToggleAll => "toggle-all".to_string(),
            Self::ClearCompleted => "clear-completed".to_string(),
            Self::Filter(f) => format!("filter-{f:?}").to_lowercase(),
            Self::Item(n) => format!("todo-{n}"),
            Self::Label(n) => format!("todo-{n}-label"),
            Self::Destroy(n) => format!("todo-{n}-destroy"),
            Self::Checkbox(n) => format!("todo-{n}-toggle"),
            Self::Editor(n) => format!("todo-{n}-edit"),
        };
        ElementHandle::new(id)
    }

    const fn owner(self) -> Option<u32> {
        match self {
            Self::Item(n)
            | Self::Label(n)
            | Self::Destroy(n)
            | Self::Checkbox(n)
            | Self::Editor(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct App {
    url: String,
    todos: Vec<Todo>,
    next_id: u32,
    filter: Filter,
    entry: String,
    editing: Option<(u32, String)>,
    pointer: Option<Node>,
    closed: bool,
    commands: Vec<String>,
}

impl App {
    fn on_ember_page(&self) -> bool {
        self.url.contains(PATH)
    }

    fn on_main_page(&self) -> bool {
        !self.url.is_empty() && !self.on_ember_page()
    }

    fn shown(&self) -> impl Iterator<Item = &Todo> + '_ {
        self.todos.iter().filter(move |t| match self.filter {
            Filter::All => true,
            Filter::Active => !t.completed,
            Filter::Completed => t.completed,
        })
    }

    fn todo(&self, id: u32) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    fn todo_mut(&mut self, id: u32) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    /// Every node currently in the DOM, in document order
    fn nodes(&self) -> Vec<Node> {
        if self.on_main_page() {
            return vec![Node::EmberLink];
        }
        if !self.on_ember_page() {
            return Vec::new();
        }
        let mut nodes = vec![Node::Entry];
        if !self.todos.is_empty() {
            nodes.push(Node::ToggleAll);
        }
        for todo in self.shown() {
            let n = todo.id;
            nodes.extend([Node::Item(n), Node::Checkbox(n), Node::Label(n), Node::Destroy(n)]);
            if matches!(&self.editing, Some((id, _)) if *id == n) {
                nodes.push(Node::Editor(n));
            }
        }
        if !self.todos.is_empty() {
            nodes.extend([
                Node::Filter(Filter::All),
                Node::Filter(Filter::Active),
                Node::Filter(Filter::Completed),
            ]);
        }
        if self.todos.iter().any(|t| t.completed) {
            nodes.push(Node::ClearCompleted);
        }
        nodes
    }

    fn resolve(&self, handle: &ElementHandle) -> ProbeResult<Node> {
        if self.closed {
            return Err(ProbeError::driver("browser session is closed"));
        }
        self.nodes()
            .into_iter()
            .find(|node| node.handle() == *handle)
            .ok_or_else(|| ProbeError::driver(format!("stale element reference: {}", handle.id)))
    }

    fn matches(&self, node: Node, locator: &Locator) -> bool {
        let completed = node.owner().and_then(|n| self.todo(n)).is_some_and(|t| t.completed);
        match node {
            Node::EmberLink => *locator == EMBERJS_LINK,
            Node::Entry => *locator == ember_page::NEW_TODO_ENTRY,
            Node::ToggleAll => *locator == ember_page::TOGGLE_ALL,
            Node::ClearCompleted => *locator == ember_page::CLEAR_COMPLETED,
            Node::Filter(Filter::All) => *locator == ember_page::SHOW_ALL,
            Node::Filter(Filter::Active) => *locator == ember_page::SHOW_ACTIVE,
            Node::Filter(Filter::Completed) => *locator == ember_page::SHOW_COMPLETED,
            Node::Item(_) => {
                *locator == ember_page::TODO_ENTRIES_VISIBLE
                    || (*locator == ember_page::TODO_ENTRIES_ACTIVE && !completed)
                    || (*locator == ember_page::TODO_ENTRIES_COMPLETED && completed)
            }
            Node::Label(_) => *locator == ember_page::ITEM_TEXT,
            Node::Destroy(_) => *locator == ember_page::ITEM_CLOSE,
            Node::Checkbox(_) => *locator == ember_page::ITEM_CHECKBOX,
            Node::Editor(_) => *locator == ember_page::TODO_ENTRY_EDITING,
        }
    }

    fn add(&mut self, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            return;
        }
        self.next_id += 1;
        self.todos.push(Todo {
            id: self.next_id,
            title: title.to_string(),
            completed: false,
        });
    }

    fn commit_edit(&mut self) {
        let Some((id, buffer)) = self.editing.take() else {
            return;
        };
        let title = buffer.trim().to_string();
        if title.is_empty() {
            self.todos.retain(|t| t.id != id);
        } else if let Some(todo) = self.todo_mut(id) {
            todo.title = title;
        }
    }

    fn activate(&mut self, node: Node) -> ProbeResult<()> {
        match node {
            Node::EmberLink => {
                self.url = format!("{}{PATH}", self.url.trim_end_matches('/'));
            }
            Node::ToggleAll => {
                let all_done = self.todos.iter().all(|t| t.completed);
                for todo in &mut self.todos {
                    todo.completed = !all_done;
                }
            }
            Node::ClearCompleted => self.todos.retain(|t| !t.completed),
            Node::Filter(filter) => self.filter = filter,
            Node::Checkbox(n) => {
                if let Some(todo) = self.todo_mut(n) {
                    todo.completed = !todo.completed;
                }
            }
            Node::Destroy(n) => self.todos.retain(|t| t.id != n),
            Node::Entry | Node::Item(_) | Node::Label(_) | Node::Editor(_) => {}
        }
        Ok(())
    }

    fn record(&mut self, command: String) {
        self.commands.push(command);
    }
}

/// Read-only view of the fake's state, usable after the driver has moved
/// into a session
#[derive(Debug, Clone)]
pub struct Observer(Rc<RefCell<App>>);

impl Observer {
    /// Titles of every item, in creation order
    pub fn titles(&self) -> Vec<String> {
        self.0.borrow().todos.iter().map(|t| t.title.clone()).collect()
    }

    /// (title, completed) of every item
    pub fn todos(&self) -> Vec<(String, bool)> {
        self.0
            .borrow()
            .todos
            .iter()
            .map(|t| (t.title.clone(), t.completed))
            .collect()
    }

    /// Whether the session was closed
    pub fn is_closed(&self) -> bool {
        self.0.borrow().closed
    }

    /// Commands received, oldest first
    pub fn commands(&self) -> Vec<String> {
        self.0.borrow().commands.clone()
    }
}

/// Simulated browser serving the TodoMVC landing page and Ember example
#[derive(Debug, Default)]
pub struct FakeTodoMvc {
    app: Rc<RefCell<App>>,
}

impl FakeTodoMvc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observer(&self) -> Observer {
        Observer(Rc::clone(&self.app))
    }

    fn open(&self) -> ProbeResult<()> {
        if self.app.borrow().closed {
            Err(ProbeError::driver("browser session is closed"))
        } else {
            Ok(())
        }
    }
}

impl Driver for FakeTodoMvc {
    fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.open()?;
        let mut app = self.app.borrow_mut();
        app.record(format!("navigate:{url}"));
        app.url = url.to_string();
        app.filter = Filter::All;
        app.editing = None;
        app.entry.clear();
        Ok(())
    }

    fn current_url(&self) -> ProbeResult<String> {
        self.open()?;
        Ok(self.app.borrow().url.clone())
    }

    fn find_all(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        self.open()?;
        let app = self.app.borrow();
        Ok(app
            .nodes()
            .into_iter()
            .filter(|node| app.matches(*node, locator))
            .map(Node::handle)
            .collect())
    }

    fn find_all_in(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ProbeResult<Vec<ElementHandle>> {
        let app = self.app.borrow();
        let owner = match app.resolve(parent)? {
            Node::Item(n) => n,
            _ => return Ok(Vec::new()),
        };
        Ok(app
            .nodes()
            .into_iter()
            .filter(|node| !matches!(node, Node::Item(_)) && node.owner() == Some(owner))
            .filter(|node| app.matches(*node, locator))
            .map(Node::handle)
            .collect())
    }

    fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        let app = self.app.borrow();
        let text = match app.resolve(element)? {
            Node::Item(n) | Node::Label(n) => {
                app.todo(n).map(|t| t.title.clone()).unwrap_or_default()
            }
            Node::Filter(Filter::All) => "All".to_string(),
            Node::Filter(Filter::Active) => "Active".to_string(),
            Node::Filter(Filter::Completed) => "Completed".to_string(),
            Node::ClearCompleted => "Clear completed".to_string(),
            Node::EmberLink => "Ember.js".to_string(),
            _ => String::new(),
        };
        Ok(text)
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>> {
        let app = self.app.borrow();
        let node = app.resolve(element)?;
        let value = match (node, name) {
            (Node::Item(n), "class") => {
                let completed = app.todo(n).is_some_and(|t| t.completed);
                let editing = matches!(&app.editing, Some((id, _)) if *id == n);
                let mut class = String::from("ember-view");
                if completed {
                    class.push_str(" completed");
                }
                if editing {
                    class.push_str(" editing");
                }
                Some(class)
            }
            (Node::Entry | Node::Editor(_), "value") => Some(match &app.editing {
                Some((_, buffer)) if matches!(node, Node::Editor(_)) => buffer.clone(),
                _ => app.entry.clone(),
            }),
            (Node::Filter(_), "class") => Some("ember-view".to_string()),
            _ => None,
        };
        Ok(value)
    }

    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        // The close control is only rendered while hovered.
        Ok(!matches!(self.app.borrow().resolve(element)?, Node::Destroy(_)))
    }

    fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        let mut app = self.app.borrow_mut();
        let node = app.resolve(element)?;
        app.record(format!("click:{}", element.id));
        if matches!(node, Node::Destroy(_)) {
            return Err(ProbeError::driver(format!(
                "element not interactable: {}",
                element.id
            )));
        }
        app.activate(node)
    }

    fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        let mut app = self.app.borrow_mut();
        match app.resolve(element)? {
            Node::Entry => app.entry.clear(),
            Node::Editor(_) => {
                if let Some((_, buffer)) = app.editing.as_mut() {
                    buffer.clear();
                }
            }
            _ => return Err(ProbeError::driver(format!("element not editable: {}", element.id))),
        }
        app.record(format!("clear:{}", element.id));
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        let mut app = self.app.borrow_mut();
        let node = app.resolve(element)?;
        app.record(format!("send_keys:{}:{text}", element.id));
        for ch in text.chars() {
            match (node, ch) {
                (Node::Entry, keys::ENTER) => {
                    let title = std::mem::take(&mut app.entry);
                    app.add(&title);
                }
                (Node::Entry, ch) => app.entry.push(ch),
                (Node::Editor(_), keys::ENTER) => {
                    app.commit_edit();
                    break;
                }
                (Node::Editor(_), keys::ESCAPE) => {
                    app.editing = None;
                    break;
                }
                (Node::Editor(_), ch) => {
                    if let Some((_, buffer)) = app.editing.as_mut() {
                        buffer.push(ch);
                    }
                }
                _ => {
                    return Err(ProbeError::driver(format!(
                        "element not editable: {}",
                        element.id
                    )))
                }
            }
        }
        Ok(())
    }

    fn execute_script(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> ProbeResult<serde_json::Value> {
        self.open()?;
        let mut app = self.app.borrow_mut();
        let ids: Vec<&str> = args.iter().map(|a| a.id.as_str()).collect();
        app.record(format!("execute_script:{script}:{}", ids.join(",")));
        if script != JS_CLICK_SCRIPT {
            return Err(ProbeError::driver(format!("unsupported script: {script}")));
        }
        let target = args
            .first()
            .ok_or_else(|| ProbeError::driver("click script needs an element argument"))?;
        let node = app.resolve(target)?;
        app.activate(node)?;
        Ok(serde_json::Value::Null)
    }

    fn perform(&self, chain: &ActionChain) -> ProbeResult<()> {
        let mut app = self.app.borrow_mut();
        app.record(format!("perform:{:?}", chain.actions()));
        for action in chain.actions() {
            match action {
                PointerAction::MoveTo(handle) => {
                    let node = app.resolve(handle)?;
                    app.pointer = Some(node);
                }
                PointerAction::Click => {
                    if let Some(node) = app.pointer {
                        app.activate(node)?;
                    }
                }
                PointerAction::DoubleClick => {
                    if let Some(Node::Item(n) | Node::Label(n)) = app.pointer {
                        let title = app.todo(n).map(|t| t.title.clone()).unwrap_or_default();
                        app.editing = Some((n, title));
                    }
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) -> ProbeResult<()> {
        self.open()?;
        let mut app = self.app.borrow_mut();
        app.record("close".to_string());
        app.closed = true;
        Ok(())
    }
}

/// Config pointing at the fake, with short waits
pub fn config() -> SuiteConfig {
    SuiteConfig::default()
        .with_base_url(BASE_URL)
        .with_timeout(Duration::from_millis(500))
        .with_poll_interval(Duration::from_millis(10))
}

/// Wait settings matching [`config`]
pub fn wait_options() -> WaitOptions {
    let config = config();
    WaitOptions::new()
        .with_timeout(config.timeout)
        .with_poll_interval(config.poll_interval)
}

/// Main page over a fresh fake, plus an observer
pub fn main_page() -> (TodoMvcMainPage<FakeTodoMvc>, Observer) {
    let fake = FakeTodoMvc::new();
    let observer = fake.observer();
    (TodoMvcMainPage::new(Session::started(fake), &config()), observer)
}

/// Opened Ember page over a fresh fake, plus an observer
pub fn ember_page() -> ProbeResult<(EmberTodoPage<FakeTodoMvc>, Observer)> {
    let fake = FakeTodoMvc::new();
    let observer = fake.observer();
    let mut page = EmberTodoPage::new(Session::started(fake), &config());
    page.open()?;
    Ok((page, observer))
}
