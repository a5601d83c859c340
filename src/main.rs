use anyhow::{Context, Result, bail};
use colored::*;
use tracing_subscriber::EnvFilter;

use codepath_client::PageApp;
use codepath_client::action::ActionOutcome;
use codepath_client::charts::ChartSpec;
use codepath_client::config::Config;
use codepath_client::dom::Document;
use codepath_client::pages::{chat, interview, onboarding, quiz, resources};
use codepath_client::quiz::group_name;

const USAGE: &str = "usage: codepath <command>

commands:
  quiz <topic> [answer...]    generate a quiz and score the given answers
  chat <message>              ask the mentor one question
  interview [answer]          fetch a practice question, optionally answer it
  mock-interview              walk the fixed interview question set
  roadmap <career> <skill>    generate a learning roadmap
  resources <topic> [query]   open the resources page, optionally search
  skills                      draw the skills radar";

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered regions on stdout stay clean
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();
    let app = PageApp::new(&config).context("failed to build backend transport")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let doc = Document::new();
    match command.as_str() {
        "quiz" => run_quiz(&app, &doc, rest).await?,
        "chat" => run_chat(&app, &doc, rest).await?,
        "interview" => run_interview(&app, &doc, rest).await?,
        "mock-interview" => run_mock_interview(&app, &doc).await?,
        "roadmap" => run_roadmap(&app, &doc, rest).await?,
        "resources" => run_resources(&app, &doc, rest).await?,
        "skills" => {
            let spec = app.skills(doc.clone()).render_radar()?;
            print_chart_summary(&spec);
        }
        "help" | "--help" | "-h" => eprintln!("{USAGE}"),
        other => bail!("unknown command '{other}'\n\n{USAGE}"),
    }

    Ok(())
}

async fn run_quiz(app: &PageApp, doc: &Document, args: &[String]) -> Result<()> {
    let Some((topic, answers)) = args.split_first() else {
        bail!("quiz needs a topic");
    };
    doc.set_input(quiz::TOPIC_INPUT, topic.as_str());

    let mut page = app.quiz(doc.clone());
    let outcome = page.load().await;
    print_region(doc, quiz::QUESTIONS);
    if !outcome.is_rendered() {
        report_outcome(&outcome);
        return Ok(());
    }

    for (i, answer) in answers.iter().enumerate() {
        doc.check_radio(&group_name(i), answer.as_str());
    }
    let report = page.submit()?;
    print_region(doc, quiz::RESULT);
    print_region(doc, quiz::LEADERBOARD);
    eprintln!(
        "   {} {}/{} ({}%), +{} XP",
        "Score:".bright_green(),
        report.score,
        report.total,
        report.percentage,
        report.reward
    );

    let user = &app.config().user;
    page.report_score(user.username.clone(), &user.stream).await;
    print_region(doc, quiz::SYNC_STATUS);
    Ok(())
}

async fn run_chat(app: &PageApp, doc: &Document, args: &[String]) -> Result<()> {
    if args.is_empty() {
        bail!("chat needs a message");
    }
    doc.set_input(chat::PROMPT_INPUT, args.join(" "));
    let outcome = app.chat(doc.clone()).send().await;
    report_outcome(&outcome);
    print_region(doc, chat::TRANSCRIPT);
    Ok(())
}

async fn run_interview(app: &PageApp, doc: &Document, args: &[String]) -> Result<()> {
    let mut page = app.interview(doc.clone());
    let outcome = page.next_question().await;
    print_region(doc, interview::QUESTION);
    if !outcome.is_rendered() || args.is_empty() {
        report_outcome(&outcome);
        return Ok(());
    }

    doc.set_input(interview::ANSWER_INPUT, args.join(" "));
    let outcome = page.submit_answer().await;
    report_outcome(&outcome);
    print_region(doc, interview::FEEDBACK);
    Ok(())
}

async fn run_mock_interview(app: &PageApp, doc: &Document) -> Result<()> {
    let mut page = app.interview(doc.clone());
    let outcome = page.start_mock_interview().await;
    report_outcome(&outcome);
    if !outcome.is_rendered() {
        print_region(doc, interview::QUESTION);
        return Ok(());
    }
    loop {
        print_region(doc, interview::PROGRESS);
        print_region(doc, interview::QUESTION);
        if !page.advance()? {
            break;
        }
    }
    Ok(())
}

async fn run_roadmap(app: &PageApp, doc: &Document, args: &[String]) -> Result<()> {
    let [career, skill] = args else {
        bail!("roadmap needs <career> <skill>");
    };
    let mut page = app.onboarding(doc.clone());
    page.choose_career(career);
    page.choose_skill_level(skill);
    let outcome = page.generate_roadmap().await;
    report_outcome(&outcome);
    print_region(doc, onboarding::ROADMAP);
    if let Some(roadmap) = outcome.rendered() {
        for item in roadmap.items() {
            eprintln!(
                "   {} {} {}",
                item.week.bright_yellow(),
                "->".cyan(),
                onboarding::resources_link(&item.topics).white()
            );
        }
    }
    Ok(())
}

async fn run_resources(app: &PageApp, doc: &Document, args: &[String]) -> Result<()> {
    let Some((topic, query)) = args.split_first() else {
        bail!("resources needs a topic");
    };
    let mut page = app.resources(doc.clone(), &onboarding::resources_link(topic))?;
    print_region(doc, resources::HEADING);

    if !query.is_empty() {
        let outcome = page.search(&query.join(" ")).await;
        report_outcome(&outcome);
        print_region(doc, resources::AI_RESOURCES);
    }

    page.show_analysis()?;
    for canvas in ["time-chart", "progress-chart"] {
        if let Some(spec) = doc.chart(canvas) {
            print_chart_summary(&spec);
        }
    }
    Ok(())
}

fn print_region(doc: &Document, id: &str) {
    let markup = doc.render(id);
    if markup.is_empty() {
        return;
    }
    println!("{} {}", "#".bright_cyan(), id.bright_cyan());
    println!("{markup}");
}

fn print_chart_summary(spec: &ChartSpec) {
    let tag = if spec.illustrative { " (sample data)" } else { "" };
    println!(
        "{} {} {}{}",
        "#".bright_cyan(),
        spec.canvas.bright_cyan(),
        spec.title.white(),
        tag.yellow()
    );
    for (label, value) in spec.labels.iter().zip(&spec.values) {
        println!("   {label}: {value}");
    }
}

fn report_outcome<T>(outcome: &ActionOutcome<T>) {
    match outcome {
        ActionOutcome::Rendered(_) => {}
        ActionOutcome::Skipped(e) => eprintln!("   {} {}", "Skipped:".yellow(), e),
        ActionOutcome::Failed(e) => eprintln!("   {} {}", "Failed:".red(), e),
        ActionOutcome::Superseded => eprintln!("   {}", "Superseded by a newer request".yellow()),
    }
}
