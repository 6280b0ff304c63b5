use std::future::Future;
use std::io::Read;

use structopt::StructOpt;

use mailpace::{Context, EmailClient, Message};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mailpace-send",
    about = "Send one email through MailPace. The body is read from stdin."
)]
struct Opt {
    #[structopt(short, long)]
    from: String,

    /// Recipient, or a comma-separated list of recipients
    #[structopt(short, long)]
    to: String,

    #[structopt(short, long)]
    subject: Option<String>,

    #[structopt(long)]
    cc: Option<String>,

    #[structopt(long)]
    bcc: Option<String>,

    #[structopt(long)]
    reply_to: Option<String>,

    #[structopt(long)]
    list_unsubscribe: Option<String>,

    /// Treat stdin as the HTML body instead of plain text
    #[structopt(long)]
    html: bool,

    #[structopt(long = "tag")]
    tags: Vec<String>,

    /// Path to a TOML config file
    #[structopt(short, long)]
    config: Option<String>,

    /// Request timeout in seconds, overrides the config file
    #[structopt(long)]
    timeout: Option<u64>,
}

impl Opt {
    fn into_message(self, body: String) -> Message {
        let mut mail = Message::new(self.from, self.to);

        mail = if self.html {
            mail.with_html_body(body)
        } else {
            mail.with_text_body(body)
        };

        mail.subject = self.subject;
        mail.cc = self.cc;
        mail.bcc = self.bcc;
        mail.reply_to = self.reply_to;
        mail.list_unsubscribe = self.list_unsubscribe;

        if !self.tags.is_empty() {
            mail = mail.with_tags(serde_json::json!(self.tags));
        }

        mail
    }
}

/// Send `mail`, giving up as soon as `interrupt` resolves.
///
/// Dropping the send aborts the request if it is still in flight.
async fn send_or_interrupt<I>(
    client: &EmailClient,
    mail: &Message,
    ctx: &Context,
    interrupt: I,
) -> Result<(), mailpace::Error>
where
    I: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = interrupt => {
            log::info!("Interrupted, cancelling send");
            Err(mailpace::Error::Cancelled)
        }
        res = client.send(mail, ctx) => res,
    }
}

async fn run(opt: Opt, body: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = mailpace::config::load_settings(opt.config.as_deref())?;
    if let Some(secs) = opt.timeout {
        settings.timeout_secs = Some(secs);
    }

    let client = EmailClient::from_settings(&settings);
    let ctx = settings.context();
    let mail = opt.into_message(body);

    log::info!("Sending email to {} via {}", mail.to, client.endpoint());

    // SIGINT is only taken over while the request is running
    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    send_or_interrupt(&client, &mail, &ctx, interrupt).await?;

    log::info!("Email accepted");

    Ok(())
}

#[tokio::main]
async fn main() {
    // Init logger
    env_logger::builder().format_timestamp_micros().init();

    let opt = Opt::from_args();

    // Get message body from stdin
    let mut body = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut body) {
        log::error!("Failed to read email body from stdin: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(opt, body).await {
        log::error!("Failed to send email: {}", e);
        std::process::exit(1);
    }
}
