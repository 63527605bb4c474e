use medbridge::content::ClientConfig;
use medbridge::host::{FailurePolicy, HostConfig, Services};
use medbridge::loopback::{Loopback, LoopbackClient};
use medbridge::message::{
    now_timestamp, Ack, BridgeMessage, DoseSchedule, FrequencyUnit, HostRequest, Medicine,
    MedicineForm, NotificationResult, NotificationSchedule, ScheduleSave, ScheduleSnapshot,
    ShareMessage, Theme, UserProfile,
};
use tokio::sync::broadcast;

use crate::cmd::{parse_duration, runtime, SimulateArgs};
use crate::exit::{bridge_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::{print_messages, OutputFormat};

const USER_ID: &str = "demo-user";

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    if args.times.is_empty() {
        return Err(CliError::new(USAGE, "--times must list at least one HH:MM"));
    }
    let timeout = parse_duration(&args.timeout)?;
    let host_config = HostConfig {
        failure_policy: if args.error_replies {
            FailurePolicy::ErrorReply
        } else {
            FailurePolicy::Silent
        },
        ..HostConfig::default()
    };
    let client_config = ClientConfig {
        request_timeout: timeout,
        ..ClientConfig::default()
    };

    let rt = runtime()?;
    let received = rt.block_on(async {
        let mut bridge = Loopback::start(Services::in_memory(), host_config, client_config);
        let mut inbound = bridge.client().subscribe();
        bridge.mount();

        let outcome = exchange(bridge.client(), &args).await;
        bridge.shutdown().await;
        outcome.map(|()| drain(&mut inbound))
    })?;

    print_messages(&received, format);
    Ok(SUCCESS)
}

async fn exchange(client: &LoopbackClient, args: &SimulateArgs) -> CliResult<()> {
    let now = now_timestamp();

    let saved: Ack = client
        .call(HostRequest::ProfileSave(profile(&now)))
        .await
        .map_err(|err| bridge_error("profile save failed", err))?;
    expect_success("profile save", saved.success)?;

    let _: Option<UserProfile> = client
        .call(HostRequest::ProfileLoad)
        .await
        .map_err(|err| bridge_error("profile load failed", err))?;

    let medicine = medicine(&args.medicine, &now);
    let mut schedule = schedule(&medicine, &args.times, &now);

    let scheduled: NotificationResult = client
        .call(HostRequest::NotificationSchedule(NotificationSchedule {
            medicine_name: medicine.name.clone(),
            scheduled_times: args.times.clone(),
            schedule_id: Some(schedule.id.clone()),
        }))
        .await
        .map_err(|err| bridge_error("notification schedule failed", err))?;
    schedule.notification_ids = scheduled.notification_ids.unwrap_or_default();

    let saved: Ack = client
        .call(HostRequest::ScheduleSave(ScheduleSave {
            medicine: Some(medicine),
            schedule: Some(schedule),
        }))
        .await
        .map_err(|err| bridge_error("schedule save failed", err))?;
    expect_success("schedule save", saved.success)?;

    let _: ScheduleSnapshot = client
        .call(HostRequest::ScheduleLoad)
        .await
        .map_err(|err| bridge_error("schedule load failed", err))?;

    if let Some(body) = &args.share {
        let _: Ack = client
            .call(HostRequest::SendMessage(ShareMessage {
                body: body.clone(),
                title: None,
            }))
            .await
            .map_err(|err| bridge_error("share failed", err))?;
    }
    Ok(())
}

fn drain(inbound: &mut broadcast::Receiver<BridgeMessage>) -> Vec<BridgeMessage> {
    let mut received = Vec::new();
    while let Ok(msg) = inbound.try_recv() {
        received.push(msg);
    }
    received
}

fn expect_success(step: &str, success: bool) -> CliResult<()> {
    if success {
        Ok(())
    } else {
        Err(CliError::new(FAILURE, format!("{step} reported failure")))
    }
}

fn profile(now: &str) -> UserProfile {
    UserProfile {
        id: USER_ID.to_string(),
        name: "Demo Patient".to_string(),
        date_of_birth: "1950-01-01".to_string(),
        photo_uri: None,
        emergency_contact_name: "Demo Caregiver".to_string(),
        emergency_contact_phone: "+15550100".to_string(),
        caregiver_name: Some("Demo Caregiver".to_string()),
        caregiver_phone: Some("+15550100".to_string()),
        biometric_enabled: false,
        theme: Theme::System,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    }
}

fn medicine(name: &str, now: &str) -> Medicine {
    Medicine {
        id: "med-1".to_string(),
        user_id: USER_ID.to_string(),
        name: name.to_string(),
        brand_name: None,
        strength: 500.0,
        unit: "mg".to_string(),
        form: MedicineForm::Tablet,
        color: None,
        instructions: Some("Take with food".to_string()),
        prescribed_by: None,
        total_pills: None,
        remaining_pills: None,
        refill_threshold: None,
        is_active: true,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    }
}

fn schedule(medicine: &Medicine, times: &[String], now: &str) -> DoseSchedule {
    DoseSchedule {
        id: "sched-1".to_string(),
        medicine_id: medicine.id.clone(),
        user_id: USER_ID.to_string(),
        frequency: FrequencyUnit::Daily,
        times_per_day: times.len() as u32,
        scheduled_times: times.to_vec(),
        days_of_week: None,
        start_date: now.get(..10).unwrap_or(now).to_string(),
        end_date: None,
        notification_ids: Vec::new(),
        is_active: true,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    }
}
