//! Interactive portal session
//!
//! Credential prompt, then a small menu loop: show grades, save offered
//! course details, re-login, or quit. Authentication failures reprompt;
//! fetch failures abort the current operation and return to the menu.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uniport::config::Config;
use uniport::error::PortalError;
use uniport::grades;
use uniport::models::CourseTree;
use uniport::portal::PortalClient;
use uniport::report::{text, xlsx, SaveFormat};
use uniport::resolver::{self, QueryOutcome, QuerySelection};
use uniport::{error, verbose};

const CREDENTIALS_PROMPT: &str = "
################################################
# Enter your student id and password separated #
# by space e.g 123 ABC                         #
#                                              #
# Enter q to quit                              #
################################################
ID and Password: ";

const OPTION_PROMPT: &str = "
################################################
# Select option:                               #
# 1. Show grades                               #
# 2. Save offered course details               #
# 3. Re-login                                  #
#                                              #
# Enter anything else to quit                  #
################################################
Option: ";

const COURSE_QUERY_PROMPT: &str = "
################################################
# Enter query course codes separated by space  #
# e.g ENG101 ENG102 ... (all selects every     #
# offered code)                                #
# * LABS are auto detected                     #
################################################
Codes: ";

const FILE_FORMAT_PROMPT: &str = "
################################################
# Save file as -                               #
# 1. Text only                                 #
# 2. Spreadsheet only                          #
# 3. Both text and spreadsheet                 #
################################################
File format: ";

/// Run the interactive session loop
pub fn run(config: &Config) {
    let token_cache = PathBuf::from(&config.paths.token_cache);
    let mut client = PortalClient::new(&config.portal.base_url, token_cache);

    loop {
        let Some(input) = prompt(CREDENTIALS_PROMPT) else {
            break;
        };
        let input = input.trim();
        if input == "q" {
            break;
        }
        let Some((student_id, password)) = input.split_once(' ') else {
            println!("Invalid input! Follow the procedure...");
            continue;
        };

        match client.authenticate(student_id.trim(), password) {
            Ok(true) => {
                let re_login = run_menu(&client, config);
                if !re_login {
                    break;
                }
            }
            Ok(false) => {
                println!("Invalid credentials or connection error. Please try again...");
            }
            Err(e) => {
                error!("Authentication failed: {e}");
                println!("Error: {e}");
            }
        }
    }
}

/// Menu loop for an authenticated session. Returns `true` when the user
/// asked to re-login, `false` to quit.
fn run_menu(client: &PortalClient, config: &Config) -> bool {
    loop {
        let Some(choice) = prompt(OPTION_PROMPT) else {
            return false;
        };
        println!();
        match choice.trim() {
            "1" => {
                if let Err(e) = show_grades(client) {
                    report_failure("Grade report", &e);
                }
            }
            "2" => {
                if let Err(e) = save_course_details(client, config) {
                    report_failure("Saving course details", &e);
                }
            }
            "3" => return true,
            _ => return false,
        }
    }
}

fn show_grades(client: &PortalClient) -> Result<(), PortalError> {
    let attempts = client.fetch_registered_attempts()?;
    verbose!("Fetched {} registered course attempts", attempts.len());
    let report = grades::aggregate(attempts);
    println!("{}", text::render_grade_report(&report));
    Ok(())
}

fn save_course_details(client: &PortalClient, config: &Config) -> Result<(), PortalError> {
    let Some(query_input) = prompt(COURSE_QUERY_PROMPT) else {
        return Ok(());
    };
    let selection = QuerySelection::parse(&query_input);

    let format_input = prompt(FILE_FORMAT_PROMPT).unwrap_or_default();
    let format = SaveFormat::parse(&format_input).unwrap_or_else(|| {
        println!("Invalid file format! Saving as both...");
        SaveFormat::Both
    });

    let offered = CourseTree::from_records(client.fetch_offered_sections()?);
    let prereqs = CourseTree::from_records(client.fetch_prerequisites()?);
    verbose!(
        "Built lookup trees: {} offered codes, {} prerequisite codes",
        offered.len(),
        prereqs.len()
    );

    match resolver::resolve(&offered, &prereqs, &selection) {
        QueryOutcome::EmptyQuery => println!("No query found!"),
        QueryOutcome::NoMatch => println!("No match found!"),
        QueryOutcome::Resolved(resolution) => {
            let output_dir = Path::new(&config.paths.output_dir);
            std::fs::create_dir_all(output_dir)?;

            if format.includes_text() {
                let path = output_dir.join("course_details.txt");
                text::write_course_details(&path, &resolution)?;
                println!("Text file saved at {}.", path.display());
            }
            if format.includes_spreadsheet() {
                let path = output_dir.join("course_details.xlsx");
                xlsx::write_course_details(&path, &resolution)?;
                println!("Spreadsheet saved at {}.", path.display());
            }
        }
    }
    Ok(())
}

fn report_failure(operation: &str, e: &PortalError) {
    error!("{operation} failed: {e}");
    println!("Error: {e}");
}

/// Print a prompt and read one line; `None` on EOF or read failure
fn prompt(text: &str) -> Option<String> {
    print!("{text}");
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}
