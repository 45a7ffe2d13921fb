use clap::{Arg, ArgMatches, Command};

use hrms_client::error::Result;
use hrms_client::models::{
    employee_name_for, AttendanceEntry, AttendanceFilter, AttendanceStatus, EmployeeDraft,
};
use hrms_client::prelude::Hrms;

fn draft_args() -> [Arg<'static>; 4] {
    [
        Arg::new("employee-id")
            .long("employee-id")
            .value_name("CODE")
            .takes_value(true)
            .required(true)
            .help("Unique employee code, e.g. EMP001"),
        Arg::new("name")
            .long("name")
            .value_name("NAME")
            .takes_value(true)
            .required(true)
            .help("Full name"),
        Arg::new("email")
            .long("email")
            .value_name("EMAIL")
            .takes_value(true)
            .required(true)
            .help("Email address"),
        Arg::new("department")
            .long("department")
            .value_name("DEPT")
            .takes_value(true)
            .required(true)
            .help("Department name"),
    ]
}

fn cli() -> Command<'static> {
    Command::new("hrms")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Employee roster and attendance records, remote or local")
        .after_help(
            "Configuration comes from the environment: set HRMS_API_URL to talk to a \
             backend (plus HRMS_AUTH_TOKEN when it requires auth), or leave it unset \
             to keep records in local JSON files under HRMS_DATA_DIR (default .hrms).",
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("employees")
                .about("Manage the employee roster")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("list").about("List all employees"))
                .subcommand(
                    Command::new("add")
                        .about("Create an employee")
                        .args(draft_args()),
                )
                .subcommand(
                    Command::new("update")
                        .about("Replace an employee record's fields")
                        .arg(
                            Arg::new("id")
                                .value_name("RECORD_ID")
                                .required(true)
                                .help("Record id of the employee to update"),
                        )
                        .args(draft_args()),
                )
                .subcommand(
                    Command::new("rm").about("Delete an employee record").arg(
                        Arg::new("id")
                            .value_name("RECORD_ID")
                            .required(true)
                            .help("Record id of the employee to delete"),
                    ),
                ),
        )
        .subcommand(
            Command::new("attendance")
                .about("Record and inspect attendance")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("mark")
                        .about("Mark one employee present or absent for a day")
                        .arg(
                            Arg::new("employee-id")
                                .long("employee-id")
                                .value_name("CODE")
                                .takes_value(true)
                                .required(true),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .takes_value(true)
                                .required(true),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .value_name("STATUS")
                                .takes_value(true)
                                .required(true)
                                .help("Present or Absent"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List attendance records, optionally filtered")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .takes_value(true),
                        )
                        .arg(
                            Arg::new("employee-id")
                                .long("employee-id")
                                .value_name("CODE")
                                .takes_value(true),
                        ),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Exchange credentials for a session token")
                .arg(Arg::new("email").value_name("EMAIL").required(true))
                .arg(Arg::new("password").value_name("PASSWORD").required(true)),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and print its session token")
                .arg(Arg::new("name").value_name("NAME").required(true))
                .arg(Arg::new("email").value_name("EMAIL").required(true))
                .arg(Arg::new("password").value_name("PASSWORD").required(true)),
        )
        .subcommand(
            Command::new("logout").about("Revoke the session token from HRMS_AUTH_TOKEN"),
        )
}

fn draft_from(matches: &ArgMatches) -> EmployeeDraft {
    EmployeeDraft::new(
        matches.get_one::<String>("employee-id").unwrap().as_str(),
        matches.get_one::<String>("name").unwrap().as_str(),
        matches.get_one::<String>("email").unwrap().as_str(),
        matches.get_one::<String>("department").unwrap().as_str(),
    )
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let hrms = Hrms::from_env()?;

    match matches.subcommand() {
        Some(("employees", sub)) => match sub.subcommand() {
            Some(("list", _)) => {
                let employees = hrms.store().list_employees().await?;
                if employees.is_empty() {
                    println!("No employees yet.");
                    return Ok(());
                }
                for e in &employees {
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        e.id, e.employee_id, e.full_name, e.email, e.department
                    );
                }
            }
            Some(("add", sub)) => {
                let employee = hrms.store().create_employee(&draft_from(sub)).await?;
                println!("Created {} ({})", employee.employee_id, employee.id);
            }
            Some(("update", sub)) => {
                let id = sub.get_one::<String>("id").unwrap();
                let employee = hrms.store().update_employee(id, &draft_from(sub)).await?;
                println!("Updated {} ({})", employee.employee_id, employee.id);
            }
            Some(("rm", sub)) => {
                let id = sub.get_one::<String>("id").unwrap();
                hrms.store().delete_employee(id).await?;
                println!("Deleted {id}");
            }
            _ => unreachable!(),
        },
        Some(("attendance", sub)) => match sub.subcommand() {
            Some(("mark", sub)) => {
                let status: AttendanceStatus =
                    sub.get_one::<String>("status").unwrap().parse()?;
                let entry = AttendanceEntry::new(
                    sub.get_one::<String>("employee-id").unwrap().as_str(),
                    sub.get_one::<String>("date").unwrap().as_str(),
                    status,
                );
                let record = hrms.store().mark_attendance(&entry).await?;
                println!(
                    "Marked {} {} on {} ({})",
                    record.employee_id, record.status, record.date, record.id
                );
            }
            Some(("list", sub)) => {
                let mut filter = AttendanceFilter::default();
                if let Some(date) = sub.get_one::<String>("date") {
                    filter = filter.with_date(date.as_str());
                }
                if let Some(code) = sub.get_one::<String>("employee-id") {
                    filter = filter.with_employee_id(code.as_str());
                }

                let employees = hrms.store().list_employees().await?;
                let records = hrms.store().list_attendance(&filter).await?;
                if records.is_empty() {
                    println!("No attendance records.");
                    return Ok(());
                }
                for r in &records {
                    println!(
                        "{}\t{}\t{}\t{}",
                        r.date,
                        r.employee_id,
                        employee_name_for(&employees, &r.employee_id),
                        r.status
                    );
                }
            }
            _ => unreachable!(),
        },
        Some(("login", sub)) => {
            let session = hrms
                .auth()
                .login(
                    sub.get_one::<String>("email").unwrap(),
                    sub.get_one::<String>("password").unwrap(),
                )
                .await?;
            println!("{}", session.token);
        }
        Some(("register", sub)) => {
            let session = hrms
                .auth()
                .register(
                    sub.get_one::<String>("name").unwrap(),
                    sub.get_one::<String>("email").unwrap(),
                    sub.get_one::<String>("password").unwrap(),
                )
                .await?;
            println!("{}", session.token);
        }
        Some(("logout", _)) => {
            hrms.auth().logout().await?;
            println!("Logged out.");
        }
        _ => unreachable!(),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = cli().get_matches();
    if let Err(e) = run(&matches).await {
        // Messages are already phrased for the user; print them verbatim.
        eprintln!("{e}");
        std::process::exit(1);
    }
}
