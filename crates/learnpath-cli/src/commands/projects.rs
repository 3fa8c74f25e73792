use anyhow::Result;
use clap::{Args, Subcommand};

use learnpath_core::models::{Project, ProjectInput};
use learnpath_core::{actions, Deletion, Route};

use super::{print_json, print_message, Context, StdinConfirm};

#[derive(Args, Debug)]
pub struct ProjectFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long, default_value = "")]
    requirements: String,
    #[arg(long, default_value = "")]
    objectives: String,
    #[arg(long, default_value = "")]
    resources: String,
    /// Estimated time in hours
    #[arg(long, default_value_t = 1)]
    hours: i64,
    #[arg(long, default_value = "beginner")]
    level: String,
    #[arg(long, default_value = "python")]
    language: String,
    #[arg(long, default_value_t = 0)]
    order: i64,
}

impl ProjectFields {
    fn into_input(self, course_id: Option<i64>) -> ProjectInput {
        ProjectInput {
            course_id,
            title: self.title,
            description: self.description,
            requirements: self.requirements,
            objectives: self.objectives,
            resources: self.resources,
            estimated_time: self.hours,
            level: self.level,
            language: self.language,
            order: self.order,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List projects, optionally for one course
    List {
        #[arg(long)]
        course: Option<i64>,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        course: i64,
        #[command(flatten)]
        fields: ProjectFields,
    },
    Update {
        id: i64,
        #[command(flatten)]
        fields: ProjectFields,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Start working on a project
    Start {
        id: i64,
    },
    /// Projects of a course
    ByCourse {
        course_id: i64,
    },
}

pub async fn run(ctx: &Context, command: ProjectCommand) -> Result<()> {
    let client = ctx.client();

    match command {
        ProjectCommand::List { course } => {
            ctx.require(Route::Projects)?;
            print_projects(&client.list_projects(course).await?);
        }
        ProjectCommand::Show { id } => {
            ctx.require(Route::ProjectDetail(id))?;
            print_json(&client.project(id).await?)?;
        }
        ProjectCommand::Create { course, fields } => {
            ctx.require(Route::ProjectCreate)?;
            let project = client.create_project(&fields.into_input(Some(course))).await?;
            println!("Created project {}", project.title);
            println!("Open: {}", Route::ProjectDetail(project.id));
        }
        ProjectCommand::Update { id, fields } => {
            ctx.require(Route::ProjectEdit(id))?;
            let project = client.update_project(id, &fields.into_input(None)).await?;
            println!("Updated project {}", project.title);
        }
        ProjectCommand::Delete { id, yes } => {
            ctx.require(Route::ProjectDetail(id))?;
            ctx.require_admin("delete projects")?;
            match actions::delete_project(client, id, &StdinConfirm { assume_yes: yes }).await? {
                Deletion::Cancelled => println!("Cancelled"),
                Deletion::Deleted { redirect } => println!("Project deleted. Back to {}", redirect),
            }
        }
        ProjectCommand::Start { id } => {
            ctx.require(Route::ProjectDetail(id))?;
            ctx.require_learner("start projects")?;
            let envelope = client.start_project(id).await?;
            print_message(envelope.message.as_deref(), "Project started");
        }
        ProjectCommand::ByCourse { course_id } => {
            ctx.require(Route::CourseDetail(course_id))?;
            print_projects(&client.course_projects(course_id).await?);
        }
    }
    Ok(())
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects");
        return;
    }
    for project in projects {
        println!(
            "{:>5}  {}  [{}, {}]",
            project.id,
            project.title,
            project.level_label(),
            project.language_label()
        );
    }
}
