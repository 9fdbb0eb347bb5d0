//! Interactive front-end — ISO listing, selection and mounting as menu items.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::core::iso::{IsoInfo, IsoManager};
use crate::ui::menu::{InputHandler, Menu, MenuItem, Step};

/// Status line holding the current selection.
pub const SELECTION_STATUS: &str = "iso2chroot.selection";

type Shared<T> = Rc<RefCell<T>>;

/// Run the menu on stdin/stdout until the user quits or input ends.
pub fn launch(config: &AppConfig) -> anyhow::Result<()> {
    let manager = Rc::new(RefCell::new(IsoManager::new(&config.iso_dir)));
    tracing::debug!(dir = %manager.borrow().directory().display(), "starting menu");
    let mut menu = Menu::new(config.title.as_str());
    register_menu(&mut menu, manager, config.mount_dir.clone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    menu.run(stdin.lock(), stdout.lock())?;
    Ok(())
}

/// Register the ISO items and the selection status line on `menu`.
pub fn register_menu(menu: &mut Menu, manager: Shared<IsoManager>, mount_dir: PathBuf) {
    let selected: Shared<Option<IsoInfo>> = Rc::default();
    menu.set_status(SELECTION_STATUS, "Selected ISO: (none)");

    let list_manager = Rc::clone(&manager);
    let list_selected = Rc::clone(&selected);
    menu.add_item(MenuItem::new("1", "List ISOs").action(move |m| {
        let loaded = list_manager.borrow_mut().load();
        let listing = match loaded {
            Ok(listing) => listing,
            Err(err) => {
                m.set_content(format!("Error: {err}"));
                return Ok(None);
            }
        };

        m.set_content(listing.display);
        if listing.count == 0 {
            return Ok(None);
        }
        m.append_content("Enter the number of the ISO to select it, or 'b' to cancel.");
        Ok(Some(choose_iso(Rc::clone(&list_manager), Rc::clone(&list_selected))))
    }));

    menu.add_item(MenuItem::new("2", "Mount selected ISO").action(move |m| {
        let Some(iso) = selected.borrow().clone() else {
            m.set_content("No ISO selected yet. Use [1] to pick one first.");
            return Ok(None);
        };

        m.set_content(format!(
            "iso2chroot will mount {} into {} using sudo.",
            iso.name,
            mount_dir.display()
        ));
        m.append_content("You may be prompted for your sudo password.");
        m.append_content("Press Enter to continue or type 'n' to cancel.");
        Ok(Some(confirm_mount(Rc::clone(&manager), iso, mount_dir.clone())))
    }));
}

/// Wait for a listing number; re-installs itself until the input resolves.
fn choose_iso(manager: Shared<IsoManager>, selected: Shared<Option<IsoInfo>>) -> InputHandler {
    InputHandler::new(move |m, input| {
        let lower = input.trim().to_lowercase();
        match lower.as_str() {
            "" => {
                m.set_content("Enter a number to choose an ISO, or 'b' to cancel.");
                return Ok(Some(choose_iso(manager, selected)));
            }
            "b" | "back" => {
                m.set_content("Selection cancelled.");
                return Ok(None);
            }
            _ => {}
        }

        let found = lower
            .parse::<usize>()
            .ok()
            .and_then(|choice| manager.borrow().select(choice).ok());
        let Some(iso) = found else {
            let count = manager.borrow().entry_count();
            m.set_content(format!("Invalid selection: {input:?}"));
            m.append_content(&format!("Enter a number between 1 and {count}, or 'b' to cancel."));
            return Ok(Some(choose_iso(manager, selected)));
        };

        let line = format!("Selected ISO: {}", iso.name);
        m.set_status(SELECTION_STATUS, line.as_str());
        m.set_content(line);
        *selected.borrow_mut() = Some(iso);
        Ok(None)
    })
}

fn confirm_mount(manager: Shared<IsoManager>, iso: IsoInfo, mount_dir: PathBuf) -> InputHandler {
    InputHandler::new(move |m, input| -> Step {
        match input.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => {}
            _ => {
                m.set_content("Mount cancelled.");
                return Ok(None);
            }
        }

        manager.borrow().mount_image(&iso, &mount_dir)?;
        m.set_content(format!("Mounted {} to {}", iso.name, mount_dir.display()));
        Ok(None)
    })
}
