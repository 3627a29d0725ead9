use super::cli_plan::{plan_example, plan_from_csv_menu, plan_from_json_menu, show_config};
use crate::settings::RtConfig;
use std::io::{self, Write};

pub fn run_interactive_menu(config: &RtConfig) {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => plan_from_csv_menu(config),
            "2" => plan_example(config),
            "3" => plan_from_json_menu(config),
            "4" => show_config(config),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n RT mix: reverse-transcription reaction planner\n
    RNA input volumes, pre-dilutions and master mix for a batch of samples \n \x1b[0m"
    );
    println!("\x1b[33m1. Plan samples from a CSV file\x1b[0m");
    println!("\x1b[33m2. Plan the example samples\x1b[0m");
    println!("\x1b[33m3. Plan a JSON request file\x1b[0m");
    println!("\x1b[33m4. Show reaction configuration\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

/// Reads one line from stdin; an unreadable or closed stdin gives "0" so menus exit.
pub fn get_user_input() -> String {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => "0".to_string(),
        Ok(_) => input,
    }
}
