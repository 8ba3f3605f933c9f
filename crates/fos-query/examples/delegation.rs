//! Example: delegated click handling with fos-query
//!
//! Run with `RUST_LOG=fos_query=debug` to see registry and listener logs.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use fos_query::{Handler, Registry};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = fos_html::parse(
        r#"<ul id="todo">
             <li class="task">Write parser</li>
             <li class="task">Write tests</li>
           </ul>"#,
    )?;

    let mut registry = Registry::new(doc.clone());
    let clicked = Rc::new(RefCell::new(Vec::new()));

    let todo = registry.acquire("#todo")?;
    let log = Rc::clone(&clicked);
    todo.on(
        "click",
        Handler::delegated(".task", move |task, _| log.borrow_mut().push(task)),
    )?;

    // Added after the listener was attached
    let list = todo.first().context("no #todo list")?;
    let late = doc.create_element("li");
    doc.add_class(late, "task")?;
    doc.set_text_content(late, "Ship it")?;
    doc.append_child(list, late)?;

    let tasks = registry.acquire(".task")?;
    for &task in tasks.nodes() {
        doc.click(task)?;
    }
    doc.click(late)?;
    tasks.add_class("done")?;

    for &task in clicked.borrow().iter() {
        println!("clicked: {}", doc.text_content(task)?.trim());
    }
    println!("markup: {}", fos_html::inner_html(&doc, list)?);
    Ok(())
}
