use anyhow::Result;
use futures::try_join;

use learnpath_core::models::AdminOverview;
use learnpath_core::Route;

use super::Context;

/// Landing dashboard for the signed-in role.
pub async fn show(ctx: &Context) -> Result<()> {
    ctx.require(Route::Dashboard)?;
    if ctx.session.is_admin() {
        return show_admin(ctx).await;
    }

    let client = ctx.client();
    let (dashboard, progress) = try_join!(client.learner_dashboard(), client.learner_progress())?;

    let stats = &dashboard.dashboard_stats;
    println!("Projects enrolled:  {}", stats.total_enrolled_projects);
    println!("  completed:        {}", stats.completed_projects);
    println!("  in progress:      {}", stats.in_progress_projects);
    println!("Hours spent:        {}", stats.total_hours_spent);
    println!("Current streak:     {} days", stats.current_streak_days);
    println!("Completion rate:    {:.1}%", stats.completion_rate);
    if let Some(ref level) = stats.skill_level {
        println!("Skill level:        {}", level);
    }

    let overall = &progress.progress_data.overall;
    println!();
    println!("Days active:        {}", overall.days_active);
    println!("Estimated hours:    {}", overall.total_hours_estimated);
    if let Some(ref since) = overall.enrollment_date {
        println!("Enrolled since:     {}", since);
    }
    Ok(())
}

/// Admin totals and the most recent courses and projects.
pub async fn show_admin(ctx: &Context) -> Result<()> {
    ctx.require(Route::AdminDashboard)?;
    let overview = ctx.client().admin_overview().await?;
    print_admin(&overview);
    Ok(())
}

fn print_admin(overview: &AdminOverview) {
    println!("Courses:            {}", overview.total_courses);
    println!("  active:           {}", overview.active_courses);
    println!("Projects:           {}", overview.total_projects);
    println!("Learners enrolled:  {}", overview.total_learners);

    println!();
    println!("Recent courses:");
    for course in &overview.recent_courses {
        let id = course.id.map(|id| id.to_string()).unwrap_or_default();
        println!("{:>5}  {}", id, course.title);
    }
    println!();
    println!("Recent projects:");
    for project in &overview.recent_projects {
        println!("{:>5}  {}", project.id, project.title);
    }
}
