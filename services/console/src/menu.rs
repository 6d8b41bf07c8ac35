use std::io::{self, BufRead, Write};

use vacancy_scout::postings::PostingStore;
use vacancy_scout::sources::VacancySource;

use crate::console::Console;

const MENU: &str = "\nMenu:
1. Fetch postings from HeadHunter
2. Delete a posting by ID
3. Filter postings by keywords
4. Filter postings by salary
5. Show all postings
6. Exit";

/// Run the interactive loop until the user exits or input ends.
pub(crate) async fn run<S, P, W, R>(console: &mut Console<'_, S, P, W>, mut input: R) -> io::Result<()>
where
    S: VacancySource + ?Sized,
    P: PostingStore + ?Sized,
    W: Write,
    R: BufRead,
{
    loop {
        writeln!(console.out(), "{MENU}")?;
        let Some(choice) = prompt(console.out(), &mut input, "Choose an action: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(query) = prompt(console.out(), &mut input, "Search query: ")? else {
                    break;
                };
                console.fetch(&query).await?;
            }
            "2" => {
                let Some(id) = prompt(console.out(), &mut input, "ID of the posting to delete: ")?
                else {
                    break;
                };
                console.delete(&id)?;
            }
            "3" => {
                let Some(line) = prompt(
                    console.out(),
                    &mut input,
                    "Keywords to filter by (space separated): ",
                )?
                else {
                    break;
                };
                let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
                console.search(&words)?;
            }
            "4" => {
                let Some(range) = prompt(console.out(), &mut input, "Salary range (min-max): ")?
                else {
                    break;
                };
                console.salary(&range)?;
            }
            "5" => console.list()?,
            "6" => {
                writeln!(console.out(), "Goodbye.")?;
                return Ok(());
            }
            _ => writeln!(console.out(), "Unknown choice.")?,
        }
    }

    writeln!(console.out(), "Input closed, exiting.")
}

/// Print `label` and read one trimmed line. `None` on end of input.
fn prompt<W: Write, R: BufRead>(out: &mut W, input: &mut R, label: &str) -> io::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
