//! Interactive command loop.
//!
//! Each command runs to completion (retries and backoff included) before
//! the next prompt. A failed command is rendered and the loop continues;
//! only a console I/O failure ends the session early.

use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use crate::{
    console::Console, pagination::list_bucket, transport::Transport, NewUser, PhotoAppClient,
    PhotoAppError, Result,
};

/// Operator command codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    End,
    Stats,
    Users,
    Assets,
    Download,
    Bucket,
    Upload,
    AddUser,
    Analyze,
    Search,
}

impl TryFrom<i64> for Command {
    type Error = i64;

    fn try_from(code: i64) -> std::result::Result<Self, Self::Error> {
        Ok(match code {
            0 => Command::End,
            1 => Command::Stats,
            2 => Command::Users,
            3 => Command::Assets,
            4 => Command::Download,
            5 => Command::Bucket,
            6 => Command::Upload,
            7 => Command::AddUser,
            8 => Command::Analyze,
            9 => Command::Search,
            other => return Err(other),
        })
    }
}

/// Local settings for commands that touch the filesystem.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    /// Directory downloaded assets are written to.
    pub download_dir: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
        }
    }
}

/// Runs commands read from `console` until command 0 or end of input.
pub async fn run_session<T, R, W>(
    client: &PhotoAppClient<T>,
    console: &mut Console<R, W>,
    settings: &SessionSettings,
) -> std::io::Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    let mut session = Session {
        client,
        console,
        settings,
    };

    loop {
        let Some(code) = session.console.read_command()? else {
            session.console.say("**ERROR: invalid input")?;
            continue;
        };
        let command = match Command::try_from(code) {
            Ok(Command::End) => return Ok(()),
            Ok(command) => command,
            Err(_) => {
                session.console.say("** Unknown command, try again...")?;
                continue;
            }
        };

        tracing::debug!(?command, "running command");
        match session.run(command).await {
            Ok(()) => {}
            Err(PhotoAppError::Io(err)) => return Err(err),
            Err(err) => {
                tracing::debug!(?command, error = %err, "command failed");
                session.console.report(&err)?;
            }
        }
    }
}

struct Session<'a, T, R, W> {
    client: &'a PhotoAppClient<T>,
    console: &'a mut Console<R, W>,
    settings: &'a SessionSettings,
}

impl<T, R, W> Session<'_, T, R, W>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::End => Ok(()),
            Command::Stats => self.stats().await,
            Command::Users => self.users().await,
            Command::Assets => self.assets().await,
            Command::Download => self.download().await,
            Command::Bucket => self.bucket().await,
            Command::Upload => self.upload().await,
            Command::AddUser => self.add_user().await,
            Command::Analyze => self.analyze().await,
            Command::Search => self.search().await,
        }
    }

    async fn stats(&mut self) -> Result<()> {
        let stats = self.client.stats().await?;
        self.console.say(format!("bucket status: {}", stats.message))?;
        self.console
            .say(format!("# of users in PhotoApp DB: {}", stats.num_users))?;
        self.console
            .say(format!("# of assets in PhotoApp DB: {}", stats.num_assets))?;
        Ok(())
    }

    async fn users(&mut self) -> Result<()> {
        for user in self.client.users().await? {
            self.console.say(format!("User id: {}", user.userid))?;
            self.console.say(format!(" Email: {}", user.email))?;
            self.console
                .say(format!(" Name: {}, {}", user.lastname, user.firstname))?;
            self.console.say(format!(" Folder: {}", user.bucketfolder))?;
        }
        Ok(())
    }

    async fn assets(&mut self) -> Result<()> {
        for asset in self.client.assets().await? {
            self.console.say(format!("Asset id: {}", asset.assetid))?;
            self.console.say(format!(" User id: {}", asset.userid))?;
            self.console.say(format!(" Asset name: {}", asset.assetname))?;
            self.console.say(format!(" Bucket key: {}", asset.bucketkey))?;
        }
        Ok(())
    }

    async fn download(&mut self) -> Result<()> {
        let asset_id = self.ask_id("Enter asset id>", "asset id")?;
        let asset = self.client.download(asset_id).await?;

        self.console.say(format!("userid: {}", asset.user_id))?;
        self.console.say(format!("asset name: {}", asset.asset_name))?;
        self.console.say(format!("bucket key: {}", asset.bucket_key))?;

        let file_name = Path::new(&asset.asset_name)
            .file_name()
            .ok_or_else(|| {
                PhotoAppError::Precondition(format!(
                    "asset name '{}' is not a usable file name",
                    asset.asset_name
                ))
            })?
            .to_owned();
        let path = self.settings.download_dir.join(file_name);
        fs::write(&path, &asset.bytes).map_err(|source| PhotoAppError::LocalFile {
            path: path.clone(),
            source,
        })?;

        self.console
            .say(format!("Downloaded from S3 and saved as '{}'", path.display()))?;
        Ok(())
    }

    async fn bucket(&mut self) -> Result<()> {
        let listing = list_bucket(self.client, &mut *self.console).await?;
        tracing::debug!(?listing, "bucket listing finished");
        Ok(())
    }

    async fn upload(&mut self) -> Result<()> {
        let local = self.ask("Enter local filename>")?;
        let path = PathBuf::from(local.trim());
        if !path.is_file() {
            return Err(PhotoAppError::Precondition(format!(
                "Local file '{}' does not exist...",
                path.display()
            )));
        }
        let user_id = self.ask_id("Enter user id>", "user id")?;

        let bytes = fs::read(&path).map_err(|source| PhotoAppError::LocalFile {
            path: path.clone(),
            source,
        })?;
        let asset_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let asset_id = self.client.upload(user_id, &asset_name, &bytes).await?;
        self.console
            .say(format!("Image uploaded, asset id = {asset_id}"))?;
        Ok(())
    }

    async fn add_user(&mut self) -> Result<()> {
        let email = self.ask("Enter user's email>")?;
        let lastname = self.ask("Enter user's last (family) name>")?;
        let firstname = self.ask("Enter user's first (given) name>")?;

        let user = NewUser {
            email,
            lastname,
            firstname,
            bucketfolder: uuid::Uuid::new_v4().to_string(),
        };
        let upsert = self.client.put_user(&user).await?;
        self.console.say(format!(
            "User {} successfully {}",
            upsert.user_id, upsert.message
        ))?;
        Ok(())
    }

    async fn analyze(&mut self) -> Result<()> {
        let asset_id = self.ask_id("Enter asset id>", "asset id")?;
        let analysis = self.client.labels(asset_id).await?;

        self.console
            .say(format!("analyzing '{}'...", analysis.asset_name))?;
        if analysis.labels.is_empty() {
            self.console.say("No labels found...")?;
        }
        for label in &analysis.labels {
            self.console.say(format!(
                "{} with {}% confidence",
                label.name, label.confidence
            ))?;
        }
        Ok(())
    }

    async fn search(&mut self) -> Result<()> {
        let label = self.ask("Enter label to search for>")?;
        let hits = self.client.search(label.trim()).await?;

        if hits.is_empty() {
            self.console.say("No assets found...")?;
        }
        for hit in &hits {
            self.console.say(format!(
                "asset {} with {}% confidence",
                hit.asset_id, hit.confidence
            ))?;
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        Ok(self.console.ask(prompt)?.unwrap_or_default())
    }

    fn ask_id(&mut self, prompt: &str, what: &str) -> Result<i64> {
        let answer = self.ask(prompt)?;
        answer
            .trim()
            .parse::<i64>()
            .map_err(|_| PhotoAppError::Precondition(format!("invalid {what} '{}'", answer.trim())))
    }
}
