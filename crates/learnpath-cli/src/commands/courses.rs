use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::debug;

use learnpath_core::models::{Course, CourseInput};
use learnpath_core::{actions, Deletion, Route};

use super::{print_json, print_message, Context, StdinConfirm};

#[derive(Args, Debug)]
pub struct CourseFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long, default_value = "beginner")]
    level: String,
    #[arg(long, default_value = "programming")]
    category: String,
    /// Estimated duration in hours
    #[arg(long, default_value_t = 1)]
    duration: i64,
    #[arg(long)]
    public: bool,
}

impl From<CourseFields> for CourseInput {
    fn from(fields: CourseFields) -> Self {
        CourseInput {
            title: fields.title,
            description: fields.description,
            level: fields.level,
            category: fields.category,
            estimated_duration: fields.duration,
            is_public: fields.public,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CourseCommand {
    /// List all courses
    List,
    Show {
        id: i64,
    },
    /// Course with enrollment state and projects
    Details {
        id: i64,
    },
    Create(CourseFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: CourseFields,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    Join {
        id: i64,
    },
    /// Whether you are enrolled in a course
    Enrollment {
        id: i64,
    },
    /// Courses you have joined
    Mine,
}

pub async fn run(ctx: &Context, command: CourseCommand) -> Result<()> {
    let client = ctx.client();

    match command {
        CourseCommand::List => {
            ctx.require(Route::Courses)?;
            print_courses(&client.list_courses().await?);
        }
        CourseCommand::Show { id } => {
            ctx.require(Route::CourseDetail(id))?;
            print_json(&client.course(id).await?)?;
        }
        CourseCommand::Details { id } => {
            ctx.require(Route::CourseDetail(id))?;
            print_json(&client.course_details(id).await?)?;
        }
        CourseCommand::Create(fields) => {
            ctx.require(Route::CourseCreate)?;
            let course = client.create_course(&fields.into()).await?;
            println!("Created course {}", course.title);
            if let Some(id) = course.id {
                println!("Open: {}", Route::CourseDetail(id));
            }
        }
        CourseCommand::Update { id, fields } => {
            ctx.require(Route::CourseEdit(id))?;
            let envelope = client.update_course(id, &fields.into()).await?;
            print_message(envelope.message.as_deref(), "Course updated");
        }
        CourseCommand::Delete { id, yes } => {
            ctx.require(Route::CourseDetail(id))?;
            ctx.require_admin("delete courses")?;
            // The summary is informational; deletion proceeds without it
            match client.confirm_delete_course(id).await {
                Ok(summary) => {
                    if let Some(message) = summary.message {
                        eprintln!("{}", message);
                    }
                }
                Err(e) => debug!(error = %e, "No delete summary"),
            }

            match actions::delete_course(client, id, &StdinConfirm { assume_yes: yes }).await? {
                Deletion::Cancelled => println!("Cancelled"),
                Deletion::Deleted { redirect } => println!("Course deleted. Back to {}", redirect),
            }
        }
        CourseCommand::Join { id } => {
            ctx.require(Route::CourseDetail(id))?;
            ctx.require_learner("join courses")?;
            let envelope = client.join_course(id).await?;
            print_message(envelope.message.as_deref(), "Joined course");
        }
        CourseCommand::Enrollment { id } => {
            ctx.require(Route::CourseDetail(id))?;
            let enrollment = client.check_enrollment(id).await?;
            println!(
                "{}",
                if enrollment.is_enrolled {
                    "Enrolled"
                } else {
                    "Not enrolled"
                }
            );
        }
        CourseCommand::Mine => {
            ctx.require(Route::MyCourses)?;
            print_courses(&client.my_courses().await?);
        }
    }
    Ok(())
}

fn print_courses(courses: &[Course]) {
    if courses.is_empty() {
        println!("No courses");
        return;
    }
    for course in courses {
        let id = course.id.map(|id| id.to_string()).unwrap_or_default();
        println!(
            "{:>5}  {}  [{}, {}]",
            id,
            course.title,
            course.level_label(),
            course.category_label()
        );
    }
}
