//! Line-oriented command shell

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use zeroize::Zeroizing;

use lamad_client::onboarding::OnboardingStep;
use lamad_client::{
    ActiveView, ClientError, Intent, Language, OnboardingEvent, Role, SessionController,
    SignUpForm,
};

const HELP: &str = "\
Onboarding:
  start                                   leave the welcome screen
  lang <code>                             choose language (en hi bn mr ta te)
  user <student|teacher> <signup|login>   choose account type
  register <name> <username> <email> <password> <grade|teacher-code> [school]
  bonus                                   claim the welcome bonus
  demo [username]                         list or pick a demo account
  login [<identifier> <secret>] [remember]
  back                                    previous step / previous activity
Signed in:
  view | go <ref> | dashboard | back | lang <code> | logout
Any time:
  status | stats | help | quit";

pub async fn run(controller: &mut SessionController) -> Result<()> {
    println!("Type 'help' for commands.");
    print_status(controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, rest)) = words.split_first() else {
            continue;
        };

        match *command {
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            _ => {
                if let Err(e) = execute(controller, command, rest).await {
                    debug!(error = %e, "Command failed");
                    println!("! {}", e.localized(controller.language()));
                }
            }
        }
    }

    Ok(())
}

async fn execute(
    controller: &mut SessionController,
    command: &str,
    args: &[&str],
) -> std::result::Result<(), ClientError> {
    match (command, args) {
        ("status", _) => print_status(controller),

        ("stats", _) => {
            let stats = controller.resolver().stats().await;
            println!(
                "attempts={} remote={} roster={} cache={} rejected={} exhausted={} cancelled={}",
                stats.attempts,
                stats.remote_successes,
                stats.roster_successes,
                stats.cache_successes,
                stats.rejections,
                stats.exhausted,
                stats.cancelled
            );
        }

        ("start", []) => {
            controller.onboarding(OnboardingEvent::Start)?;
            print_status(controller);
        }

        ("lang", [code]) => {
            let language: Language = code.parse()?;
            let choosing = matches!(
                controller.session().onboarding().map(|m| m.step()),
                Some(OnboardingStep::LanguageSelect)
            );
            if choosing {
                controller.onboarding(OnboardingEvent::ChooseLanguage(language))?;
            } else {
                controller.change_language(language)?;
            }
            print_status(controller);
        }

        ("user", [role, intent]) => {
            let role: Role = role.parse()?;
            let intent = match *intent {
                "signup" => Intent::SignUp,
                "login" => Intent::Login,
                other => {
                    println!("! unknown intent '{}', use signup or login", other);
                    return Ok(());
                }
            };
            controller.onboarding(OnboardingEvent::ChooseUserType { role, intent })?;
            print_status(controller);
        }

        ("register", [name, username, email, password, extra, school @ ..]) => {
            let mut form = SignUpForm {
                name: name.replace('_', " "),
                username: username.to_string(),
                email: email.to_string(),
                password: Zeroizing::new(password.to_string()),
                school: school.join(" "),
                ..Default::default()
            };
            match extra.parse::<u8>() {
                Ok(grade) => form.grade = Some(grade),
                Err(_) => form.teacher_code = Some(extra.to_string()),
            }
            controller.sign_up(form).await?;
            print_status(controller);
        }

        ("bonus", []) => {
            controller.onboarding(OnboardingEvent::ClaimBonus)?;
            print_status(controller);
        }

        ("demo", []) => {
            for account in controller.resolver().roster().accounts() {
                println!(
                    "  {:<12} {:<8} {}",
                    account.username,
                    account.role.as_str(),
                    account.name
                );
            }
        }

        ("demo", [username]) => {
            controller.select_demo_account(username)?;
            println!("Demo account '{}' selected, type 'login'", username);
        }

        ("login", []) | ("login", ["remember"]) => {
            let resolution = controller.login_demo(!args.is_empty()).await?;
            println!("Signed in via {}", resolution.tier.as_str());
            print_status(controller);
        }

        ("login", [identifier, secret, flags @ ..]) => {
            let remember = flags.first() == Some(&"remember");
            let resolution = controller.login(identifier, secret, remember).await?;
            println!("Signed in via {}", resolution.tier.as_str());
            print_status(controller);
        }

        ("back", []) => {
            if controller.session().is_signed_in() {
                controller.back()?;
            } else {
                controller.onboarding(OnboardingEvent::Back)?;
            }
            print_status(controller);
        }

        ("view", []) => print_status(controller),

        ("go", [reference]) => {
            controller.navigate(reference)?;
            print_status(controller);
        }

        ("dashboard", []) => {
            controller.go_to_dashboard()?;
            print_status(controller);
        }

        ("logout", []) => {
            controller.logout()?;
            print_status(controller);
        }

        _ => println!("? unknown command, type 'help'"),
    }

    Ok(())
}

fn print_status(controller: &SessionController) {
    let language = controller.language();

    if let Some(machine) = controller.session().onboarding() {
        let step = machine.step();
        println!("[{}] onboarding: {}", language, step.name());
        match step {
            OnboardingStep::SignUp { error: Some(e) } | OnboardingStep::TeacherSignUp { error: Some(e) } => {
                println!("  {}", ClientError::from(e.clone()).localized(language));
            }
            OnboardingStep::Login { error: Some(e) } => {
                println!("  {}", ClientError::from(e.clone()).localized(language));
            }
            OnboardingStep::WelcomeBonus {
                profile,
                verification_pending,
            } => {
                println!("  Welcome, {}! Type 'bonus' to start.", profile.name);
                if *verification_pending {
                    println!("  Check your email to verify your account.");
                }
            }
            _ => {}
        }
        if let Some(demo) = controller.session().pending_demo() {
            println!("  demo account: {}", demo.identifier());
        }
        return;
    }

    let Some(profile) = controller.profile() else {
        return;
    };
    let view = match controller.current_view() {
        Some(ActiveView::Dashboard { dashboard }) => format!("dashboard {:?}", dashboard),
        Some(ActiveView::Activity { selector }) => selector.label(),
        None => "none".to_string(),
    };
    println!(
        "[{}] {} ({}, {} XP, level {}) view: {}",
        language,
        profile.username,
        profile.role(),
        profile.xp,
        profile.level,
        view
    );
}
